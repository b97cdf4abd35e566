// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::DbContext, error::AppError},
    models::auth::{User, UserRole},
};

const USER_COLUMNS: &str = "id, email, nome, password_hash, role, consultoria_id, empresa_id, colaborador_id, created_at, updated_at";

/// Dados de um usuário novo, já com a senha em hash.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub nome: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
    pub consultoria_id: Option<i32>,
    pub empresa_id: Option<i32>,
    pub colaborador_id: Option<i32>,
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // E-mail é comparado sem diferenciar maiúsculas
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    /// Lista os usuários vinculados a uma consultoria (direta ou via empresa).
    pub async fn list_by_consultoria(&self, consultoria_id: i32) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE consultoria_id = $1 ORDER BY role, nome",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(consultoria_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn list_by_empresa(&self, empresa_id: i32) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE empresa_id = $1 ORDER BY role, nome", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(empresa_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Aceita a pool ou uma transação (cadastro da consultoria)
    pub async fn create_user<'e, E>(&self, executor: E, new_user: NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO users (email, nome, password_hash, role, consultoria_id, empresa_id, colaborador_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(new_user.email)
            .bind(new_user.nome)
            .bind(new_user.password_hash)
            .bind(new_user.role)
            .bind(new_user.consultoria_id)
            .bind(new_user.empresa_id)
            .bind(new_user.colaborador_id)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                DbContext::write("usuario")
                    .unique("email", new_user.email)
                    .translate(e)
            })
    }
}
