// src/db/dashboard_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{db_utils::FilterBuilder, error::AppError},
    models::dashboard::DashboardCounts,
    services::scope::Scope,
};

/// Todos os cards do painel numa consulta só, sobre o mesmo snapshot.
/// `emp` e `col` são as empresas e colaboradores visíveis para o escopo.
pub fn build_counts_query(scope: &Scope) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new("WITH emp AS (SELECT e.id FROM empresas e");
    scope.restrict_empresas(&mut fb, "e.id", "e.consultoria_id");

    let mut qb = fb.into_inner();
    qb.push(
        r#"),
        col AS (
            SELECT c.id, c.status FROM colaboradores c WHERE c.empresa_id IN (SELECT id FROM emp)
        )
        SELECT
            (SELECT COUNT(*) FROM emp) AS empresas,
            (SELECT COUNT(*) FROM col WHERE status = 'Ativo') AS colaboradores_ativos,
            (SELECT COUNT(*) FROM col WHERE status = 'Inativo') AS colaboradores_inativos,
            (SELECT ROUND(AVG(a.nota), 2) FROM avaliacoes a
              WHERE a.colaborador_id IN (SELECT id FROM col)) AS media_avaliacoes,
            (SELECT COUNT(*) FROM pdis p
              WHERE p.colaborador_id IN (SELECT id FROM col) AND p.status = 'Em Andamento') AS pdis_em_andamento,
            (SELECT COUNT(*) FROM pdis p
              WHERE p.colaborador_id IN (SELECT id FROM col) AND p.status = 'Concluído') AS pdis_concluidos,
            (SELECT COUNT(*) FROM pdis p
              WHERE p.colaborador_id IN (SELECT id FROM col) AND p.status = 'Em Andamento'
                AND p.prazo < CURRENT_DATE) AS pdis_atrasados,
            (SELECT COUNT(*) FROM feedbacks f
              WHERE f.avaliado_id IN (SELECT id FROM col) AND f.data >= CURRENT_DATE - 30) AS feedbacks_30_dias
        "#,
    );
    qb
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn counts(&self, scope: &Scope) -> Result<DashboardCounts, AppError> {
        let mut qb = build_counts_query(scope);
        let counts = qb.build_query_as::<DashboardCounts>().fetch_one(&self.pool).await?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_companies_follow_the_scope() {
        let qb = build_counts_query(&Scope::Consultoria { consultoria_id: 2 });
        assert!(qb.sql().starts_with("WITH emp AS (SELECT e.id FROM empresas e WHERE e.consultoria_id = $1),"));

        let qb = build_counts_query(&Scope::Empresa { empresa_id: 9 });
        assert!(qb.sql().starts_with("WITH emp AS (SELECT e.id FROM empresas e WHERE e.id = $1),"));
    }
}
