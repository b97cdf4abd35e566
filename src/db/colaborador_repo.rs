// src/db/colaborador_repo.rs

use sqlx::{Executor, PgConnection, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{escape_like, non_blank, DbContext, FilterBuilder, LinkTable},
        error::AppError,
    },
    models::colaborador::{
        Colaborador, ColaboradorQuery, ContagemStatus, CreateColaboradorPayload, UpdateColaboradorPayload,
    },
    services::scope::Scope,
};

const SELECT_COLABORADORES: &str = r#"
    SELECT c.id, c.empresa_id, c.nome, c.email, c.cargo, c.data_admissao, c.status,
           ARRAY(
               SELECT cd.departamento_id FROM colaborador_departamentos cd
                WHERE cd.colaborador_id = c.id ORDER BY cd.departamento_id
           ) AS departamento_ids,
           c.created_at, c.updated_at
    FROM colaboradores c"#;

pub const DEPARTAMENTOS: LinkTable = LinkTable {
    table: "colaborador_departamentos",
    owner_col: "colaborador_id",
    target_col: "departamento_id",
    target_table: "departamentos",
    field: "departamentoIds",
};

pub fn build_list_query(scope: &Scope, query: &ColaboradorQuery) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(SELECT_COLABORADORES);
    fb.eq("c.empresa_id", query.empresa_id);
    if let Some(departamento_id) = query.departamento_id {
        fb.and()
            .push("EXISTS (SELECT 1 FROM colaborador_departamentos cd WHERE cd.colaborador_id = c.id AND cd.departamento_id = ")
            .push_bind(departamento_id)
            .push(")");
    }
    fb.eq("c.status", query.status);
    if let Some(term) = non_blank(query.q.as_deref()) {
        let pattern = format!("%{}%", escape_like(term));
        fb.and()
            .push("(c.nome ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    scope.restrict(&mut fb, "c.empresa_id", Some("c.id"));
    fb.finish_ordered("c.nome ASC, c.id ASC")
}

#[derive(Clone)]
pub struct ColaboradorRepository {
    pool: PgPool,
}

impl ColaboradorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &Scope, query: &ColaboradorQuery) -> Result<Vec<Colaborador>, AppError> {
        let mut qb = build_list_query(scope, query);
        let colaboradores = qb.build_query_as::<Colaborador>().fetch_all(&self.pool).await?;
        Ok(colaboradores)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Colaborador>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE c.id = $1", SELECT_COLABORADORES);
        let colaborador = sqlx::query_as::<_, Colaborador>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(colaborador)
    }

    /// Só o vínculo com a empresa, para checagens de escopo.
    pub async fn find_empresa_id(&self, id: i32) -> Result<Option<i32>, AppError> {
        let empresa_id = sqlx::query_scalar::<_, i32>("SELECT empresa_id FROM colaboradores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(empresa_id)
    }

    pub async fn contagem_status(&self, scope: &Scope) -> Result<ContagemStatus, AppError> {
        let mut fb = FilterBuilder::new(
            "SELECT COUNT(*) FILTER (WHERE c.status = 'Ativo') AS ativos, \
             COUNT(*) FILTER (WHERE c.status = 'Inativo') AS inativos \
             FROM colaboradores c",
        );
        scope.restrict(&mut fb, "c.empresa_id", Some("c.id"));
        let mut qb = fb.into_inner();
        let contagem = qb.build_query_as::<ContagemStatus>().fetch_one(&self.pool).await?;
        Ok(contagem)
    }

    // Insere a linha e os departamentos na mesma conexão (transação do serviço)
    pub async fn insert(&self, conn: &mut PgConnection, payload: &CreateColaboradorPayload) -> Result<i32, AppError> {
        let email = payload.email.as_deref().map(str::to_lowercase);
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO colaboradores (empresa_id, nome, email, cargo, data_admissao, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(payload.empresa_id)
        .bind(payload.nome.trim())
        .bind(&email)
        .bind(&payload.cargo)
        .bind(payload.data_admissao)
        .bind(payload.status)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            DbContext::write("colaborador")
                .unique("email", email.clone().unwrap_or_default())
                .translate(e)
        })?;

        DEPARTAMENTOS
            .replace(conn, id, payload.empresa_id, &payload.departamento_ids)
            .await?;
        Ok(id)
    }

    /// Devolve `false` quando o colaborador não existe.
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: i32,
        empresa_id: i32,
        payload: &UpdateColaboradorPayload,
    ) -> Result<bool, AppError> {
        let email = payload.email.as_deref().map(str::to_lowercase);
        let affected = sqlx::query(
            r#"
            UPDATE colaboradores
            SET nome = $2, email = $3, cargo = $4, data_admissao = $5, status = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.nome.trim())
        .bind(&email)
        .bind(&payload.cargo)
        .bind(payload.data_admissao)
        .bind(payload.status)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            DbContext::write("colaborador")
                .unique("email", email.clone().unwrap_or_default())
                .translate(e)
        })?
        .rows_affected();

        if affected == 0 {
            return Ok(false);
        }

        DEPARTAMENTOS
            .replace(conn, id, empresa_id, &payload.departamento_ids)
            .await?;
        Ok(true)
    }

    /// Falha com "registros vinculados" se houver avaliações, PDIs,
    /// feedbacks, liderança ou usuário apontando para o colaborador.
    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM colaboradores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbContext::delete("colaborador").translate(e))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::StatusRegistro;

    #[test]
    fn colaborador_role_only_lists_itself() {
        let scope = Scope::Colaborador {
            empresa_id: 1,
            colaborador_id: 9,
        };
        let qb = build_list_query(&scope, &ColaboradorQuery::default());
        assert!(qb.sql().ends_with("WHERE c.id = $1 ORDER BY c.nome ASC, c.id ASC"));
    }

    #[test]
    fn all_filters_are_combined_in_order() {
        let query = ColaboradorQuery {
            empresa_id: Some(1),
            departamento_id: Some(2),
            status: Some(StatusRegistro::Ativo),
            q: Some("ana".into()),
        };
        let qb = build_list_query(&Scope::Empresa { empresa_id: 1 }, &query);
        let sql = qb.sql();
        assert!(sql.contains("WHERE c.empresa_id = $1 AND EXISTS ("));
        assert!(sql.contains("cd.departamento_id = $2) AND c.status = $3"));
        assert!(sql.contains("AND (c.nome ILIKE $4 OR c.email ILIKE $5) AND c.empresa_id = $6"));
    }

    #[test]
    fn blank_search_term_is_ignored() {
        let query = ColaboradorQuery {
            q: Some("   ".into()),
            ..Default::default()
        };
        let qb = build_list_query(&Scope::Empresa { empresa_id: 1 }, &query);
        assert!(!qb.sql().contains("ILIKE"));
    }
}
