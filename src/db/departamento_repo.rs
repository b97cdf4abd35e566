// src/db/departamento_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{DbContext, FilterBuilder},
        error::AppError,
    },
    models::departamento::{CreateDepartamentoPayload, Departamento, DepartamentoQuery, UpdateDepartamentoPayload},
    services::scope::Scope,
};

const SELECT_DEPARTAMENTOS: &str =
    "SELECT id, empresa_id, nome, descricao, status, created_at, updated_at FROM departamentos";

pub fn build_list_query(scope: &Scope, query: &DepartamentoQuery) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(SELECT_DEPARTAMENTOS);
    fb.eq("empresa_id", query.empresa_id);
    scope.restrict(&mut fb, "empresa_id", None);
    fb.finish_ordered("nome ASC, id ASC")
}

#[derive(Clone)]
pub struct DepartamentoRepository {
    pool: PgPool,
}

impl DepartamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &Scope, query: &DepartamentoQuery) -> Result<Vec<Departamento>, AppError> {
        let mut qb = build_list_query(scope, query);
        let departamentos = qb.build_query_as::<Departamento>().fetch_all(&self.pool).await?;
        Ok(departamentos)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Departamento>, AppError> {
        let sql = format!("{} WHERE id = $1", SELECT_DEPARTAMENTOS);
        let departamento = sqlx::query_as::<_, Departamento>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(departamento)
    }

    pub async fn create(&self, payload: &CreateDepartamentoPayload) -> Result<Departamento, AppError> {
        sqlx::query_as::<_, Departamento>(
            r#"
            INSERT INTO departamentos (empresa_id, nome, descricao, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, empresa_id, nome, descricao, status, created_at, updated_at
            "#,
        )
        .bind(payload.empresa_id)
        .bind(payload.nome.trim())
        .bind(&payload.descricao)
        .bind(payload.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbContext::write("departamento").unique("nome", payload.nome.trim()).translate(e))
    }

    pub async fn update(&self, id: i32, payload: &UpdateDepartamentoPayload) -> Result<Option<Departamento>, AppError> {
        sqlx::query_as::<_, Departamento>(
            r#"
            UPDATE departamentos
            SET nome = $2, descricao = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, empresa_id, nome, descricao, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(payload.nome.trim())
        .bind(&payload.descricao)
        .bind(payload.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DbContext::write("departamento").unique("nome", payload.nome.trim()).translate(e))
    }

    // Os vínculos com colaboradores e líderes caem em cascata
    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM departamentos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbContext::delete("departamento").translate(e))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_empresa_filter_is_combined_with_scope() {
        let query = DepartamentoQuery { empresa_id: Some(4) };
        let qb = build_list_query(&Scope::Consultoria { consultoria_id: 1 }, &query);
        assert!(qb.sql().ends_with(
            "WHERE empresa_id = $1 AND empresa_id IN (SELECT id FROM empresas WHERE consultoria_id = $2) ORDER BY nome ASC, id ASC"
        ));
    }
}
