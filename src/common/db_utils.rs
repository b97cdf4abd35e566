use std::{num::IntErrorKind, str::FromStr};

use serde::Serialize;
use sqlx::{error::ErrorKind, Encode, PgConnection, Postgres, QueryBuilder, Type};
use utoipa::ToSchema;

use crate::common::error::{AppError, DbOperation};

// ---
// Paginação
// ---

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// Janela LIMIT/OFFSET já normalizada: limit em [1, 1000] e offset >= 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageWindow {
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// Os parâmetros chegam como texto; lixo cai no padrão em vez de falhar.
    /// Número grande demais para i64 ainda é número: satura e depois passa pelo clamp.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self::clamped(limit.and_then(saturating_i64), offset.and_then(saturating_i64))
    }
}

fn saturating_i64(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(v) => Some(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Uma página de resultados. Não há cursor: o cliente pede de novo com outro offset.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            limit: window.limit,
            offset: window.offset,
        }
    }
}

// ---
// Montagem de WHERE dinâmico
// ---

/// Envolve o `QueryBuilder` do sqlx e decide entre `WHERE` e `AND`
/// conforme os predicados vão sendo adicionados.
pub struct FilterBuilder<'args> {
    qb: QueryBuilder<'args, Postgres>,
    predicates: usize,
}

impl<'args> FilterBuilder<'args> {
    pub fn new(base_select: impl Into<String>) -> Self {
        Self {
            qb: QueryBuilder::new(base_select),
            predicates: 0,
        }
    }

    /// Abre um novo predicado e devolve o builder para o chamador escrevê-lo.
    pub fn and(&mut self) -> &mut QueryBuilder<'args, Postgres> {
        if self.predicates == 0 {
            self.qb.push(" WHERE ");
        } else {
            self.qb.push(" AND ");
        }
        self.predicates += 1;
        &mut self.qb
    }

    /// `column = $n`, só quando o valor existe.
    pub fn eq<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.and().push(column).push(" = ").push_bind(value);
        }
        self
    }

    /// `column ILIKE '%termo%'`, com os curingas do termo escapados.
    pub fn contains(&mut self, column: &str, term: Option<&str>) -> &mut Self {
        if let Some(term) = term {
            let pattern = format!("%{}%", escape_like(term));
            self.and().push(column).push(" ILIKE ").push_bind(pattern);
        }
        self
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates
    }

    /// Fecha a consulta com ORDER BY e a janela de paginação.
    pub fn finish_paged(mut self, order_by: &str, window: PageWindow) -> QueryBuilder<'args, Postgres> {
        self.qb.push(" ORDER BY ").push(order_by);
        self.qb.push(" LIMIT ").push_bind(window.limit);
        self.qb.push(" OFFSET ").push_bind(window.offset);
        self.qb
    }

    pub fn finish_ordered(mut self, order_by: &str) -> QueryBuilder<'args, Postgres> {
        self.qb.push(" ORDER BY ").push(order_by);
        self.qb
    }

    /// Para quem precisa continuar a consulta (GROUP BY, CTEs).
    pub fn into_inner(self) -> QueryBuilder<'args, Postgres> {
        self.qb
    }
}

/// Escapa `\`, `%` e `_` para que o termo seja tratado literalmente no LIKE.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Trata string vazia ou só com espaços como parâmetro ausente.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Converte um parâmetro textual opcional; vazio conta como ausente.
pub fn parse_param<T: FromStr>(name: &'static str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| AppError::InvalidParameter {
            name,
            value: value.to_string(),
        }),
    }
}

// ---
// Tradução de erros do banco
// ---

/// Violações de restrição que viram erros de domínio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique,
    ForeignKey,
}

impl ConstraintViolation {
    pub fn of(err: &sqlx::Error) -> Option<Self> {
        let db_err = err.as_database_error()?;
        match db_err.kind() {
            ErrorKind::UniqueViolation => Some(Self::Unique),
            ErrorKind::ForeignKeyViolation => Some(Self::ForeignKey),
            _ => None,
        }
    }
}

/// Contexto usado para traduzir um `sqlx::Error` num `AppError` com significado.
///
/// ```ignore
/// .map_err(|e| DbContext::write("empresa").unique("cnpj", &cnpj).translate(e))
/// ```
#[derive(Debug, Clone)]
pub struct DbContext {
    entity: &'static str,
    operation: DbOperation,
    unique: Option<(&'static str, String)>,
}

impl DbContext {
    pub fn write(entity: &'static str) -> Self {
        Self {
            entity,
            operation: DbOperation::Write,
            unique: None,
        }
    }

    pub fn delete(entity: &'static str) -> Self {
        Self {
            entity,
            operation: DbOperation::Delete,
            unique: None,
        }
    }

    /// Qual campo é reportado numa violação de unicidade.
    pub fn unique(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.unique = Some((field, value.into()));
        self
    }

    pub fn translate(self, err: sqlx::Error) -> AppError {
        match self.violation_error(ConstraintViolation::of(&err)) {
            Some(app_err) => app_err,
            None => AppError::DatabaseError(err),
        }
    }

    pub(crate) fn violation_error(self, violation: Option<ConstraintViolation>) -> Option<AppError> {
        match violation? {
            ConstraintViolation::Unique => {
                let (field, value) = self.unique.unwrap_or(("registro", String::new()));
                Some(AppError::Conflict {
                    entity: self.entity,
                    field,
                    value,
                })
            }
            ConstraintViolation::ForeignKey => Some(AppError::ForeignKeyViolation {
                entity: self.entity,
                operation: self.operation,
            }),
        }
    }
}

// ---
// Tabelas de vínculo (N:N)
// ---

/// Descreve uma tabela de ligação entre um dono e registros de uma empresa.
#[derive(Debug, Clone, Copy)]
pub struct LinkTable {
    pub table: &'static str,
    pub owner_col: &'static str,
    pub target_col: &'static str,
    /// Tabela dos alvos; precisa ter `id` e `empresa_id`
    pub target_table: &'static str,
    /// Nome do campo reportado quando algum id é recusado
    pub field: &'static str,
}

impl LinkTable {
    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = $1", self.table, self.owner_col)
    }

    pub fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} ({}, {}) SELECT $1, t.id FROM {} t WHERE t.id = ANY($2) AND t.empresa_id = $3",
            self.table, self.owner_col, self.target_col, self.target_table
        )
    }

    /// Troca todo o conjunto de vínculos do dono. Ids que não existem ou são
    /// de outra empresa fazem a operação inteira falhar; rode dentro de uma
    /// transação para não deixar o conjunto pela metade.
    pub async fn replace(
        &self,
        conn: &mut PgConnection,
        owner_id: i32,
        empresa_id: i32,
        ids: &[i32],
    ) -> Result<(), AppError> {
        let wanted = dedup_ids(ids);

        sqlx::query(&self.delete_sql())
            .bind(owner_id)
            .execute(&mut *conn)
            .await?;

        if wanted.is_empty() {
            return Ok(());
        }

        let inserted = sqlx::query(&self.insert_sql())
            .bind(owner_id)
            .bind(&wanted)
            .bind(empresa_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();

        if inserted != wanted.len() as u64 {
            return Err(AppError::InvalidParameter {
                name: self.field,
                value: format!("{:?}", wanted),
            });
        }
        Ok(())
    }
}

/// Ordena e remove repetidos.
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut out = ids.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_and_offset_are_clamped() {
        assert_eq!(PageWindow::clamped(Some(5000), Some(-5)), PageWindow { limit: 1000, offset: 0 });
        assert_eq!(PageWindow::clamped(Some(0), None), PageWindow { limit: 1, offset: 0 });
        assert_eq!(PageWindow::clamped(Some(-20), Some(40)), PageWindow { limit: 1, offset: 40 });
        assert_eq!(PageWindow::clamped(None, None), PageWindow::default());
    }

    #[test]
    fn window_from_query_ignores_garbage() {
        let w = PageWindow::from_query(Some("abc"), Some("10"));
        assert_eq!(w, PageWindow { limit: DEFAULT_LIMIT, offset: 10 });

        let w = PageWindow::from_query(Some(" 5000 "), Some("-1"));
        assert_eq!(w, PageWindow { limit: MAX_LIMIT, offset: 0 });
        // Fora do alcance de i64: satura em vez de voltar ao padrão
        let w = PageWindow::from_query(Some("99999999999999999999"), Some("99999999999999999999"));
        assert_eq!(w, PageWindow { limit: MAX_LIMIT, offset: i64::MAX });

        let w = PageWindow::from_query(Some("-99999999999999999999"), Some("-99999999999999999999"));
        assert_eq!(w, PageWindow { limit: 1, offset: 0 });
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("login"), "login");
    }

    #[test]
    fn filter_builder_uses_where_then_and() {
        let mut fb = FilterBuilder::new("SELECT * FROM t");
        fb.eq::<i32>("a", None);
        assert_eq!(fb.predicate_count(), 0);

        fb.eq("a", Some(1)).contains("b", Some("x")).eq("c", Some("y".to_string()));
        let qb = fb.finish_ordered("id");
        assert_eq!(
            qb.sql(),
            "SELECT * FROM t WHERE a = $1 AND b ILIKE $2 AND c = $3 ORDER BY id"
        );
    }

    #[test]
    fn empty_filter_has_no_where() {
        let fb = FilterBuilder::new("SELECT * FROM t");
        let qb = fb.finish_paged("id DESC", PageWindow::default());
        assert_eq!(qb.sql(), "SELECT * FROM t ORDER BY id DESC LIMIT $1 OFFSET $2");
    }

    #[test]
    fn unique_violation_becomes_conflict() {
        let err = DbContext::write("empresa")
            .unique("cnpj", "11.111.111/0001-11")
            .violation_error(Some(ConstraintViolation::Unique));

        match err {
            Some(AppError::Conflict { entity, field, value }) => {
                assert_eq!(entity, "empresa");
                assert_eq!(field, "cnpj");
                assert_eq!(value, "11.111.111/0001-11");
            }
            other => panic!("esperava Conflict, veio {:?}", other),
        }
    }

    #[test]
    fn foreign_key_on_delete_becomes_linked_records() {
        let err = DbContext::delete("empresa").violation_error(Some(ConstraintViolation::ForeignKey));
        assert!(matches!(
            err,
            Some(AppError::ForeignKeyViolation { entity: "empresa", operation: DbOperation::Delete })
        ));
    }

    #[test]
    fn other_database_errors_are_not_translated() {
        assert!(DbContext::write("pdi").violation_error(None).is_none());
        let raw = DbContext::write("pdi").translate(sqlx::Error::RowNotFound);
        assert!(matches!(raw, AppError::DatabaseError(_)));
    }

    #[test]
    fn parse_param_reports_the_offending_parameter() {
        assert_eq!(parse_param::<i32>("avaliadoId", Some(" 42 ")).unwrap(), Some(42));
        assert_eq!(parse_param::<i32>("avaliadoId", Some("")).unwrap(), None);
        match parse_param::<i32>("avaliadoId", Some("abc")) {
            Err(AppError::InvalidParameter { name, value }) => {
                assert_eq!(name, "avaliadoId");
                assert_eq!(value, "abc");
            }
            other => panic!("esperava InvalidParameter, veio {:?}", other),
        }
    }

    #[test]
    fn blank_values_count_as_absent() {
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" login ")), Some("login"));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn link_replacement_only_accepts_targets_of_the_same_company() {
        let link = LinkTable {
            table: "lider_membros",
            owner_col: "lider_id",
            target_col: "colaborador_id",
            target_table: "colaboradores",
            field: "colaboradorIds",
        };
        assert_eq!(link.delete_sql(), "DELETE FROM lider_membros WHERE lider_id = $1");
        assert_eq!(
            link.insert_sql(),
            "INSERT INTO lider_membros (lider_id, colaborador_id) SELECT $1, t.id FROM colaboradores t WHERE t.id = ANY($2) AND t.empresa_id = $3"
        );
    }

    #[test]
    fn duplicated_ids_are_collapsed() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(dedup_ids(&[]).is_empty());
    }
}
