// src/db/empresa_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{DbContext, FilterBuilder},
        error::AppError,
    },
    models::empresa::{Empresa, EmpresaEstatisticas, EmpresaPayload, EmpresaRef},
    services::scope::Scope,
};

const SELECT_EMPRESAS: &str =
    "SELECT id, consultoria_id, nome, cnpj, email, telefone, endereco, status, created_at, updated_at FROM empresas";

const RETURNING: &str =
    "RETURNING id, consultoria_id, nome, cnpj, email, telefone, endereco, status, created_at, updated_at";

/// Listagem de empresas já restrita ao escopo de quem pede.
pub fn build_list_query(scope: &Scope) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new(SELECT_EMPRESAS);
    scope.restrict_empresas(&mut fb, "id", "consultoria_id");
    fb.finish_ordered("nome ASC, id ASC")
}

#[derive(Clone)]
pub struct EmpresaRepository {
    pool: PgPool,
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &Scope) -> Result<Vec<Empresa>, AppError> {
        let mut qb = build_list_query(scope);
        let empresas = qb.build_query_as::<Empresa>().fetch_all(&self.pool).await?;
        Ok(empresas)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Empresa>, AppError> {
        let sql = format!("{} WHERE id = $1", SELECT_EMPRESAS);
        let empresa = sqlx::query_as::<_, Empresa>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(empresa)
    }

    pub async fn find_ref(&self, id: i32) -> Result<Option<EmpresaRef>, AppError> {
        let empresa = sqlx::query_as::<_, EmpresaRef>("SELECT id, consultoria_id FROM empresas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(empresa)
    }

    // `cnpj` chega já formatado pelo serviço
    pub async fn create(&self, consultoria_id: i32, payload: &EmpresaPayload, cnpj: &str) -> Result<Empresa, AppError> {
        let sql = format!(
            r#"
            INSERT INTO empresas (consultoria_id, nome, cnpj, email, telefone, endereco, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            {}
            "#,
            RETURNING
        );
        sqlx::query_as::<_, Empresa>(&sql)
            .bind(consultoria_id)
            .bind(&payload.nome)
            .bind(cnpj)
            .bind(&payload.email)
            .bind(&payload.telefone)
            .bind(&payload.endereco)
            .bind(payload.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbContext::write("empresa").unique("cnpj", cnpj).translate(e))
    }

    pub async fn update(&self, id: i32, payload: &EmpresaPayload, cnpj: &str) -> Result<Option<Empresa>, AppError> {
        let sql = format!(
            r#"
            UPDATE empresas
            SET nome = $2, cnpj = $3, email = $4, telefone = $5, endereco = $6, status = $7, updated_at = NOW()
            WHERE id = $1
            {}
            "#,
            RETURNING
        );
        sqlx::query_as::<_, Empresa>(&sql)
            .bind(id)
            .bind(&payload.nome)
            .bind(cnpj)
            .bind(&payload.email)
            .bind(&payload.telefone)
            .bind(&payload.endereco)
            .bind(payload.status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbContext::write("empresa").unique("cnpj", cnpj).translate(e))
    }

    /// Exclusão física. Falha com "registros vinculados" se ainda houver
    /// departamentos, colaboradores ou usuários apontando para a empresa.
    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM empresas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DbContext::delete("empresa").translate(e))?;
        Ok(result.rows_affected())
    }

    pub async fn estatisticas(&self, id: i32) -> Result<Option<EmpresaEstatisticas>, AppError> {
        let stats = sqlx::query_as::<_, EmpresaEstatisticas>(
            r#"
            SELECT
                e.id AS empresa_id,
                (SELECT COUNT(*) FROM departamentos d WHERE d.empresa_id = e.id) AS departamentos,
                (SELECT COUNT(*) FROM colaboradores c WHERE c.empresa_id = e.id AND c.status = 'Ativo') AS colaboradores_ativos,
                (SELECT COUNT(*) FROM colaboradores c WHERE c.empresa_id = e.id AND c.status = 'Inativo') AS colaboradores_inativos,
                (SELECT COUNT(*) FROM lideres l WHERE l.empresa_id = e.id) AS lideres,
                (SELECT COUNT(*)
                   FROM pdis p
                   JOIN colaboradores c ON c.id = p.colaborador_id
                  WHERE c.empresa_id = e.id AND p.status = 'Em Andamento') AS pdis_em_andamento
            FROM empresas e
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::{error::DbOperation, test_db::TestDb},
        db::{ConsultoriaRepository, DepartamentoRepository},
        models::{departamento::CreateDepartamentoPayload, status::StatusRegistro},
    };

    #[test]
    fn list_query_for_empresa_role_pins_its_own_id() {
        let qb = build_list_query(&Scope::Empresa { empresa_id: 7 });
        assert!(qb.sql().ends_with("FROM empresas WHERE id = $1 ORDER BY nome ASC, id ASC"));
    }

    #[test]
    fn list_query_for_consultoria_filters_by_owner() {
        let qb = build_list_query(&Scope::Consultoria { consultoria_id: 3 });
        assert!(qb.sql().contains("WHERE consultoria_id = $1"));
    }

    // --- Contra um Postgres de verdade ---

    fn acme(cnpj: &str) -> EmpresaPayload {
        EmpresaPayload {
            nome: "Acme".to_string(),
            cnpj: cnpj.to_string(),
            email: None,
            telefone: None,
            endereco: None,
            status: StatusRegistro::Ativo,
        }
    }

    async fn consultoria(pool: &PgPool) -> i32 {
        ConsultoriaRepository::new(pool.clone())
            .create(pool, "Ezer", None, "contato@ezer.test")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn duplicate_cnpj_is_a_conflict_and_keeps_the_first() {
        let Some(db) = TestDb::fresh().await else { return };
        let repo = EmpresaRepository::new(db.pool.clone());
        let consultoria_id = consultoria(&db.pool).await;
        let cnpj = "11.111.111/0001-11";

        let first = repo.create(consultoria_id, &acme(cnpj), cnpj).await.unwrap();
        let err = repo.create(consultoria_id, &acme(cnpj), cnpj).await.unwrap_err();

        assert!(matches!(
            &err,
            AppError::Conflict { entity: "empresa", field: "cnpj", value } if value == cnpj
        ));
        assert_eq!(err.code(), "conflict");
        assert_eq!(repo.find_by_id(first.id).await.unwrap().unwrap().cnpj, cnpj);

        db.drop_database().await;
    }

    #[tokio::test]
    async fn delete_with_departamento_is_linked_records_and_row_survives() {
        let Some(db) = TestDb::fresh().await else { return };
        let repo = EmpresaRepository::new(db.pool.clone());
        let consultoria_id = consultoria(&db.pool).await;
        let cnpj = "22.222.222/0001-22";
        let empresa = repo.create(consultoria_id, &acme(cnpj), cnpj).await.unwrap();

        DepartamentoRepository::new(db.pool.clone())
            .create(&CreateDepartamentoPayload {
                empresa_id: empresa.id,
                nome: "Vendas".to_string(),
                descricao: None,
                status: StatusRegistro::Ativo,
            })
            .await
            .unwrap();

        let err = repo.delete(empresa.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::ForeignKeyViolation { entity: "empresa", operation: DbOperation::Delete }
        ));
        assert_eq!(err.code(), "linked_records");
        assert!(repo.find_by_id(empresa.id).await.unwrap().is_some());

        db.drop_database().await;
    }

    #[tokio::test]
    async fn empresa_scope_lists_only_itself() {
        let Some(db) = TestDb::fresh().await else { return };
        let repo = EmpresaRepository::new(db.pool.clone());
        let consultoria_id = consultoria(&db.pool).await;

        let a = repo.create(consultoria_id, &acme("33.333.333/0001-33"), "33.333.333/0001-33").await.unwrap();
        repo.create(consultoria_id, &acme("44.444.444/0001-44"), "44.444.444/0001-44").await.unwrap();

        let visible = repo.list(&Scope::Empresa { empresa_id: a.id }).await.unwrap();
        assert_eq!(visible.iter().map(|e| e.id).collect::<Vec<_>>(), vec![a.id]);

        let all = repo.list(&Scope::Consultoria { consultoria_id }).await.unwrap();
        assert_eq!(all.len(), 2);

        db.drop_database().await;
    }
}
