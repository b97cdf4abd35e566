// src/db/consultoria_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::DbContext, error::AppError},
    models::{
        consultoria::{Consultoria, UpdateConsultoriaPayload},
        status::StatusRegistro,
    },
};

const COLUMNS: &str = "id, nome, cnpj, email, telefone, status, created_at, updated_at";

#[derive(Clone)]
pub struct ConsultoriaRepository {
    pool: PgPool,
}

impl ConsultoriaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Consultoria>, AppError> {
        let sql = format!("SELECT {} FROM consultorias WHERE id = $1", COLUMNS);
        let consultoria = sqlx::query_as::<_, Consultoria>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(consultoria)
    }

    // Criada no cadastro inicial, junto com o primeiro usuário
    pub async fn create<'e, E>(
        &self,
        executor: E,
        nome: &str,
        cnpj: Option<&str>,
        email: &str,
    ) -> Result<Consultoria, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO consultorias (nome, cnpj, email) VALUES ($1, $2, $3) RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Consultoria>(&sql)
            .bind(nome)
            .bind(cnpj)
            .bind(email)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                DbContext::write("consultoria")
                    .unique("cnpj", cnpj.unwrap_or_default())
                    .translate(e)
            })
    }

    pub async fn update(
        &self,
        id: i32,
        payload: &UpdateConsultoriaPayload,
        cnpj: Option<&str>,
    ) -> Result<Option<Consultoria>, AppError> {
        let sql = format!(
            r#"
            UPDATE consultorias
            SET nome = $2, cnpj = $3, email = $4, telefone = $5, status = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        sqlx::query_as::<_, Consultoria>(&sql)
            .bind(id)
            .bind(&payload.nome)
            .bind(cnpj)
            .bind(&payload.email)
            .bind(&payload.telefone)
            .bind(payload.status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DbContext::write("consultoria")
                    .unique("cnpj", cnpj.unwrap_or_default())
                    .translate(e)
            })
    }

    /// Exclusão lógica: só marca como inativa.
    pub async fn deactivate(&self, id: i32) -> Result<Option<Consultoria>, AppError> {
        let sql = format!(
            "UPDATE consultorias SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        let consultoria = sqlx::query_as::<_, Consultoria>(&sql)
            .bind(id)
            .bind(StatusRegistro::Inativo)
            .fetch_optional(&self.pool)
            .await?;
        Ok(consultoria)
    }
}
