// src/db/audit_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{FilterBuilder, Page},
        error::AppError,
    },
    models::audit::{AuditFilter, AuditLog, NewAuditEntry, UpperBound},
};

/// Monta a busca do log. Só os filtros presentes entram no WHERE;
/// a ordem é sempre do mais recente para o mais antigo.
pub fn build_search_query(filter: &AuditFilter) -> QueryBuilder<'static, Postgres> {
    let mut fb = FilterBuilder::new("SELECT id, action, user_id, ip, details, created_at FROM audit_logs");

    fb.eq("action", filter.action.clone());
    fb.eq("user_id", filter.user_id);

    if let Some(from) = filter.from {
        fb.and().push("created_at >= ").push_bind(from);
    }
    match filter.to {
        Some(UpperBound::Inclusive(to)) => {
            fb.and().push("created_at <= ").push_bind(to);
        }
        Some(UpperBound::Exclusive(to)) => {
            fb.and().push("created_at < ").push_bind(to);
        }
        None => {}
    }

    fb.contains("details::text", filter.q.as_deref());

    // Consultoria só enxerga o que os próprios usuários fizeram
    if let Some(consultoria_id) = filter.consultoria_id {
        fb.and()
            .push("user_id IN (SELECT id FROM users WHERE consultoria_id = ")
            .push_bind(consultoria_id)
            .push(")");
    }

    fb.finish_paged("created_at DESC, id DESC", filter.window)
}

#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &NewAuditEntry) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO audit_logs (action, user_id, ip, details) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&entry.action)
        .bind(entry.user_id)
        .bind(&entry.ip)
        .bind(&entry.details)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn search(&self, filter: &AuditFilter) -> Result<Page<AuditLog>, AppError> {
        let mut qb = build_search_query(filter);
        let items = qb.build_query_as::<AuditLog>().fetch_all(&self.pool).await?;
        Ok(Page::new(items, filter.window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audit::AuditQuery;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    const BASE: &str = "SELECT id, action, user_id, ip, details, created_at FROM audit_logs";
    const TAIL: &str = "ORDER BY created_at DESC, id DESC";

    #[test]
    fn no_filters_means_no_where_clause() {
        let qb = build_search_query(&AuditFilter::default());
        assert_eq!(qb.sql(), format!("{} {} LIMIT $1 OFFSET $2", BASE, TAIL));
    }

    #[test]
    fn every_filter_adds_exactly_one_predicate() {
        let day = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let filter = AuditFilter {
            action: Some("empresa.create".into()),
            user_id: Some(Uuid::nil()),
            from: Some(day),
            to: Some(UpperBound::Exclusive(day)),
            q: Some("Acme".into()),
            consultoria_id: Some(1),
            ..Default::default()
        };
        let qb = build_search_query(&filter);
        assert_eq!(
            qb.sql(),
            format!(
                "{} WHERE action = $1 AND user_id = $2 AND created_at >= $3 AND created_at < $4 \
                 AND details::text ILIKE $5 AND user_id IN (SELECT id FROM users WHERE consultoria_id = $6) \
                 {} LIMIT $7 OFFSET $8",
                BASE, TAIL
            )
        );
    }

    #[test]
    fn subsets_of_filters_never_leave_dangling_conjunctions() {
        // Cada bit liga um filtro; nenhuma combinação pode gerar "WHERE AND" ou "AND AND"
        for mask in 0u8..32 {
            let query = AuditQuery {
                action: (mask & 1 != 0).then(|| "login".to_string()),
                user_id: (mask & 2 != 0).then(|| Uuid::nil().to_string()),
                from: (mask & 4 != 0).then(|| "2025-01-01".to_string()),
                to: (mask & 8 != 0).then(|| "2025-01-31T23:59:59Z".to_string()),
                q: (mask & 16 != 0).then(|| "x".to_string()),
                ..Default::default()
            };
            let filter = AuditFilter::parse(&query).unwrap();
            let sql = build_search_query(&filter).sql().to_string();

            let predicates = mask.count_ones() as usize;
            assert_eq!(sql.matches(" AND ").count(), predicates.saturating_sub(1), "mask {}", mask);
            assert_eq!(sql.contains(" WHERE "), predicates > 0, "mask {}", mask);
        }
    }

    #[test]
    fn inclusive_upper_bound_uses_less_or_equal() {
        let t = Utc.with_ymd_and_hms(2025, 3, 31, 15, 0, 0).unwrap();
        let filter = AuditFilter {
            to: Some(UpperBound::Inclusive(t)),
            ..Default::default()
        };
        assert!(build_search_query(&filter).sql().contains("WHERE created_at <= $1"));
    }
}
