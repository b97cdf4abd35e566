// src/db/pdi_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{DbContext, FilterBuilder},
        error::AppError,
    },
    models::{
        pdi::{CreatePdiPayload, Pdi, PdiQuery, UpdatePdiPayload},
        status::PdiStatus,
    },
    services::scope::Scope,
};

const PROJECTION: &str = r#"
    SELECT p.id, p.colaborador_id, p.objetivo, p.acoes, p.prazo, p.status,
           c.empresa_id, c.nome AS colaborador_nome, p.created_at, p.updated_at"#;

fn select_from(source: &str) -> String {
    format!("{} FROM {} p JOIN colaboradores c ON c.id = p.colaborador_id", PROJECTION, source)
}

/// Qual fatia dos PDIs em andamento olhar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prazo {
    /// Vence entre hoje e hoje + dias
    Proximo { dias: i32 },
    /// Já passou do prazo
    Atrasado,
}

pub fn build_list_query(scope: &Scope, query: &PdiQuery) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(select_from("pdis"));
    fb.eq("c.empresa_id", query.empresa_id);
    fb.eq("p.colaborador_id", query.colaborador_id);
    fb.eq("p.status", query.status);
    scope.restrict(&mut fb, "c.empresa_id", Some("p.colaborador_id"));
    fb.finish_ordered("p.prazo ASC, p.id ASC")
}

pub fn build_prazo_query(scope: &Scope, prazo: Prazo) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(select_from("pdis"));
    fb.eq("p.status", Some(PdiStatus::EmAndamento));
    match prazo {
        Prazo::Proximo { dias } => {
            fb.and()
                .push("p.prazo BETWEEN CURRENT_DATE AND CURRENT_DATE + ")
                .push_bind(dias);
        }
        Prazo::Atrasado => {
            fb.and().push("p.prazo < CURRENT_DATE");
        }
    }
    scope.restrict(&mut fb, "c.empresa_id", Some("p.colaborador_id"));
    fb.finish_ordered("p.prazo ASC, p.id ASC")
}

#[derive(Clone)]
pub struct PdiRepository {
    pool: PgPool,
}

impl PdiRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &Scope, query: &PdiQuery) -> Result<Vec<Pdi>, AppError> {
        let mut qb = build_list_query(scope, query);
        let pdis = qb.build_query_as::<Pdi>().fetch_all(&self.pool).await?;
        Ok(pdis)
    }

    pub async fn by_prazo(&self, scope: &Scope, prazo: Prazo) -> Result<Vec<Pdi>, AppError> {
        let mut qb = build_prazo_query(scope, prazo);
        let pdis = qb.build_query_as::<Pdi>().fetch_all(&self.pool).await?;
        Ok(pdis)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Pdi>, AppError> {
        let sql = format!("{} WHERE p.id = $1", select_from("pdis"));
        let pdi = sqlx::query_as::<_, Pdi>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pdi)
    }

    pub async fn create(&self, payload: &CreatePdiPayload) -> Result<Pdi, AppError> {
        let sql = format!(
            r#"
            WITH p AS (
                INSERT INTO pdis (colaborador_id, objetivo, acoes, prazo, status)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            {}
            "#,
            select_from("p")
        );
        sqlx::query_as::<_, Pdi>(&sql)
            .bind(payload.colaborador_id)
            .bind(payload.objetivo.trim())
            .bind(&payload.acoes)
            .bind(payload.prazo)
            .bind(payload.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbContext::write("pdi").translate(e))
    }

    pub async fn update(&self, id: i32, payload: &UpdatePdiPayload) -> Result<Option<Pdi>, AppError> {
        let sql = format!(
            r#"
            WITH p AS (
                UPDATE pdis
                SET objetivo = $2, acoes = $3, prazo = $4, status = $5, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {}
            "#,
            select_from("p")
        );
        sqlx::query_as::<_, Pdi>(&sql)
            .bind(id)
            .bind(payload.objetivo.trim())
            .bind(&payload.acoes)
            .bind(payload.prazo)
            .bind(payload.status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbContext::write("pdi").translate(e))
    }

    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM pdis WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbContext::delete("pdi").translate(e))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upcoming_deadlines_use_a_day_window() {
        let qb = build_prazo_query(&Scope::Empresa { empresa_id: 1 }, Prazo::Proximo { dias: 30 });
        assert!(qb.sql().contains(
            "WHERE p.status = $1 AND p.prazo BETWEEN CURRENT_DATE AND CURRENT_DATE + $2 AND c.empresa_id = $3"
        ));
    }

    #[test]
    fn overdue_has_no_window_parameter() {
        let qb = build_prazo_query(&Scope::Empresa { empresa_id: 1 }, Prazo::Atrasado);
        assert!(qb.sql().contains("WHERE p.status = $1 AND p.prazo < CURRENT_DATE AND c.empresa_id = $2"));
    }
}
