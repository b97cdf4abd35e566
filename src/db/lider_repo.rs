// src/db/lider_repo.rs

use sqlx::{Executor, PgConnection, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{DbContext, FilterBuilder, LinkTable},
        error::AppError,
    },
    models::{
        lider::{Lider, LiderQuery},
        status::StatusRegistro,
    },
    services::scope::Scope,
};

const SELECT_LIDERES: &str = r#"
    SELECT l.id, l.colaborador_id, l.empresa_id, l.status,
           c.nome AS colaborador_nome,
           ARRAY(SELECT m.colaborador_id FROM lider_membros m WHERE m.lider_id = l.id ORDER BY m.colaborador_id) AS membro_ids,
           ARRAY(SELECT d.departamento_id FROM lider_departamentos d WHERE d.lider_id = l.id ORDER BY d.departamento_id) AS departamento_ids,
           l.created_at, l.updated_at
    FROM lideres l
    JOIN colaboradores c ON c.id = l.colaborador_id"#;

pub const MEMBROS: LinkTable = LinkTable {
    table: "lider_membros",
    owner_col: "lider_id",
    target_col: "colaborador_id",
    target_table: "colaboradores",
    field: "colaboradorIds",
};

pub const DEPARTAMENTOS: LinkTable = LinkTable {
    table: "lider_departamentos",
    owner_col: "lider_id",
    target_col: "departamento_id",
    target_table: "departamentos",
    field: "departamentoIds",
};

pub fn build_list_query(scope: &Scope, query: &LiderQuery) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(SELECT_LIDERES);
    fb.eq("l.empresa_id", query.empresa_id);
    scope.restrict(&mut fb, "l.empresa_id", None);
    fb.finish_ordered("c.nome ASC, l.id ASC")
}

#[derive(Clone)]
pub struct LiderRepository {
    pool: PgPool,
}

impl LiderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &Scope, query: &LiderQuery) -> Result<Vec<Lider>, AppError> {
        let mut qb = build_list_query(scope, query);
        let lideres = qb.build_query_as::<Lider>().fetch_all(&self.pool).await?;
        Ok(lideres)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Lider>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE l.id = $1", SELECT_LIDERES);
        let lider = sqlx::query_as::<_, Lider>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(lider)
    }

    // Um colaborador lidera no máximo uma vez
    pub async fn insert(&self, conn: &mut PgConnection, empresa_id: i32, colaborador_id: i32) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>("INSERT INTO lideres (empresa_id, colaborador_id) VALUES ($1, $2) RETURNING id")
            .bind(empresa_id)
            .bind(colaborador_id)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                DbContext::write("lider")
                    .unique("colaborador", colaborador_id.to_string())
                    .translate(e)
            })
    }

    pub async fn update(&self, id: i32, colaborador_id: i32, status: StatusRegistro) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE lideres SET colaborador_id = $2, status = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(colaborador_id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbContext::write("lider")
                .unique("colaborador", colaborador_id.to_string())
                .translate(e)
        })?;
        Ok(result.rows_affected())
    }

    pub async fn touch(&self, conn: &mut PgConnection, id: i32) -> Result<(), AppError> {
        sqlx::query("UPDATE lideres SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    // Membros e departamentos caem em cascata
    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM lideres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbContext::delete("lider").translate(e))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colaborador_sees_the_leaders_of_its_company() {
        let scope = Scope::Colaborador {
            empresa_id: 3,
            colaborador_id: 8,
        };
        let qb = build_list_query(&scope, &LiderQuery::default());
        assert!(qb.sql().ends_with("WHERE l.empresa_id = $1 ORDER BY c.nome ASC, l.id ASC"));
    }
}
