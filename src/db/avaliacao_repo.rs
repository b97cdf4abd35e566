// src/db/avaliacao_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{non_blank, DbContext, FilterBuilder},
        error::AppError,
    },
    models::avaliacao::{
        Avaliacao, AvaliacaoQuery, CreateAvaliacaoPayload, MediaAvaliacao, UpdateAvaliacaoPayload,
    },
    services::scope::Scope,
};

// Projeção comum; `a` é a tabela (ou CTE) de avaliações
const PROJECTION: &str = r#"
    SELECT a.id, a.colaborador_id, a.avaliador_id, a.nota, a.tipo, a.data, a.observacoes,
           c.empresa_id, c.nome AS colaborador_nome, a.created_at, a.updated_at"#;

fn select_from(source: &str) -> String {
    format!("{} FROM {} a JOIN colaboradores c ON c.id = a.colaborador_id", PROJECTION, source)
}

pub fn build_list_query(scope: &Scope, query: &AvaliacaoQuery) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(select_from("avaliacoes"));
    fb.eq("c.empresa_id", query.empresa_id);
    fb.eq("a.colaborador_id", query.colaborador_id);
    fb.eq("a.tipo", non_blank(query.tipo.as_deref()).map(str::to_string));
    scope.restrict(&mut fb, "c.empresa_id", Some("a.colaborador_id"));
    fb.finish_ordered("a.data DESC, a.id DESC")
}

pub fn build_medias_query(scope: &Scope, query: &AvaliacaoQuery) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(
        "SELECT c.id AS colaborador_id, c.nome AS colaborador_nome, \
         ROUND(AVG(a.nota), 2) AS media, COUNT(a.id) AS total \
         FROM colaboradores c JOIN avaliacoes a ON a.colaborador_id = c.id",
    );
    fb.eq("c.empresa_id", query.empresa_id);
    fb.eq("c.id", query.colaborador_id);
    fb.eq("a.tipo", non_blank(query.tipo.as_deref()).map(str::to_string));
    scope.restrict(&mut fb, "c.empresa_id", Some("c.id"));
    let mut qb = fb.into_inner();
    qb.push(" GROUP BY c.id, c.nome ORDER BY media DESC NULLS LAST, c.nome ASC");
    qb
}

#[derive(Clone)]
pub struct AvaliacaoRepository {
    pool: PgPool,
}

impl AvaliacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &Scope, query: &AvaliacaoQuery) -> Result<Vec<Avaliacao>, AppError> {
        let mut qb = build_list_query(scope, query);
        let avaliacoes = qb.build_query_as::<Avaliacao>().fetch_all(&self.pool).await?;
        Ok(avaliacoes)
    }

    pub async fn medias(&self, scope: &Scope, query: &AvaliacaoQuery) -> Result<Vec<MediaAvaliacao>, AppError> {
        let mut qb = build_medias_query(scope, query);
        let medias = qb.build_query_as::<MediaAvaliacao>().fetch_all(&self.pool).await?;
        Ok(medias)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Avaliacao>, AppError> {
        let sql = format!("{} WHERE a.id = $1", select_from("avaliacoes"));
        let avaliacao = sqlx::query_as::<_, Avaliacao>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(avaliacao)
    }

    // INSERT e JOIN numa ida só ao banco
    pub async fn create(&self, payload: &CreateAvaliacaoPayload) -> Result<Avaliacao, AppError> {
        let sql = format!(
            r#"
            WITH a AS (
                INSERT INTO avaliacoes (colaborador_id, avaliador_id, nota, tipo, data, observacoes)
                VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE), $6)
                RETURNING *
            )
            {}
            "#,
            select_from("a")
        );
        sqlx::query_as::<_, Avaliacao>(&sql)
            .bind(payload.colaborador_id)
            .bind(payload.avaliador_id)
            .bind(payload.nota)
            .bind(payload.tipo.trim())
            .bind(payload.data)
            .bind(&payload.observacoes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbContext::write("avaliacao").translate(e))
    }

    pub async fn update(&self, id: i32, payload: &UpdateAvaliacaoPayload) -> Result<Option<Avaliacao>, AppError> {
        let sql = format!(
            r#"
            WITH a AS (
                UPDATE avaliacoes
                SET avaliador_id = $2, nota = $3, tipo = $4, data = $5, observacoes = $6, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {}
            "#,
            select_from("a")
        );
        sqlx::query_as::<_, Avaliacao>(&sql)
            .bind(id)
            .bind(payload.avaliador_id)
            .bind(payload.nota)
            .bind(payload.tipo.trim())
            .bind(payload.data)
            .bind(&payload.observacoes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbContext::write("avaliacao").translate(e))
    }

    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM avaliacoes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbContext::delete("avaliacao").translate(e))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_are_grouped_after_the_filters() {
        let query = AvaliacaoQuery {
            empresa_id: Some(2),
            ..Default::default()
        };
        let qb = build_medias_query(&Scope::Consultoria { consultoria_id: 1 }, &query);
        assert!(qb.sql().ends_with(
            "WHERE c.empresa_id = $1 AND c.empresa_id IN (SELECT id FROM empresas WHERE consultoria_id = $2) \
             GROUP BY c.id, c.nome ORDER BY media DESC NULLS LAST, c.nome ASC"
        ));
    }

    #[test]
    fn colaborador_lists_only_its_own_evaluations() {
        let scope = Scope::Colaborador {
            empresa_id: 2,
            colaborador_id: 5,
        };
        let qb = build_list_query(&scope, &AvaliacaoQuery::default());
        assert!(qb.sql().ends_with("WHERE a.colaborador_id = $1 ORDER BY a.data DESC, a.id DESC"));
    }
}
