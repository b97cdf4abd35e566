// src/db/feedback_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{DbContext, FilterBuilder, Page},
        error::AppError,
    },
    models::feedback::{CreateFeedbackPayload, Feedback, FeedbackFilter, UpdateFeedbackPayload},
    services::scope::Scope,
};

const PROJECTION: &str = r#"
    SELECT f.id, f.avaliado_id, f.avaliador_id, f.classificacao, f.data, f.observacoes,
           c.empresa_id, c.nome AS avaliado_nome, f.created_at, f.updated_at"#;

fn select_from(source: &str) -> String {
    format!("{} FROM {} f JOIN colaboradores c ON c.id = f.avaliado_id", PROJECTION, source)
}

pub fn build_search_query(scope: &Scope, filter: &FeedbackFilter) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(select_from("feedbacks"));
    fb.eq("c.empresa_id", filter.empresa_id);
    fb.eq("f.avaliado_id", filter.avaliado_id);
    fb.eq("f.avaliador_id", filter.avaliador_id);
    fb.eq("f.classificacao", filter.classificacao.clone());
    if let Some(from) = filter.from {
        fb.and().push("f.data >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        fb.and().push("f.data <= ").push_bind(to);
    }
    fb.contains("f.observacoes", filter.q.as_deref());
    scope.restrict(&mut fb, "c.empresa_id", Some("f.avaliado_id"));
    fb.finish_paged("f.data DESC, f.id DESC", filter.window)
}

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn search(&self, scope: &Scope, filter: &FeedbackFilter) -> Result<Page<Feedback>, AppError> {
        let mut qb = build_search_query(scope, filter);
        let items = qb.build_query_as::<Feedback>().fetch_all(&self.pool).await?;
        Ok(Page::new(items, filter.window))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Feedback>, AppError> {
        let sql = format!("{} WHERE f.id = $1", select_from("feedbacks"));
        let feedback = sqlx::query_as::<_, Feedback>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(feedback)
    }

    pub async fn create(&self, payload: &CreateFeedbackPayload) -> Result<Feedback, AppError> {
        let sql = format!(
            r#"
            WITH f AS (
                INSERT INTO feedbacks (avaliado_id, avaliador_id, classificacao, data, observacoes)
                VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE), $5)
                RETURNING *
            )
            {}
            "#,
            select_from("f")
        );
        sqlx::query_as::<_, Feedback>(&sql)
            .bind(payload.avaliado_id)
            .bind(payload.avaliador_id)
            .bind(payload.classificacao.trim())
            .bind(payload.data)
            .bind(&payload.observacoes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbContext::write("feedback").translate(e))
    }

    pub async fn update(&self, id: i32, payload: &UpdateFeedbackPayload) -> Result<Option<Feedback>, AppError> {
        let sql = format!(
            r#"
            WITH f AS (
                UPDATE feedbacks
                SET avaliador_id = $2, classificacao = $3, data = $4, observacoes = $5, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {}
            "#,
            select_from("f")
        );
        sqlx::query_as::<_, Feedback>(&sql)
            .bind(id)
            .bind(payload.avaliador_id)
            .bind(payload.classificacao.trim())
            .bind(payload.data)
            .bind(&payload.observacoes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbContext::write("feedback").translate(e))
    }

    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM feedbacks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbContext::delete("feedback").translate(e))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let filter = FeedbackFilter {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            to: NaiveDate::from_ymd_opt(2025, 1, 31),
            ..Default::default()
        };
        let qb = build_search_query(&Scope::Empresa { empresa_id: 4 }, &filter);
        assert!(qb.sql().contains("WHERE f.data >= $1 AND f.data <= $2 AND c.empresa_id = $3"));
        assert!(qb.sql().ends_with("ORDER BY f.data DESC, f.id DESC LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn free_text_searches_the_notes() {
        let filter = FeedbackFilter {
            q: Some("pontual".into()),
            ..Default::default()
        };
        let qb = build_search_query(&Scope::Empresa { empresa_id: 4 }, &filter);
        assert!(qb.sql().contains("WHERE f.observacoes ILIKE $1"));
    }
}
