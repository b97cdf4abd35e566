// src/models/audit.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::{
    db_utils::{non_blank, parse_param, PageWindow},
    error::AppError,
};

// Uma linha do log de auditoria (somente inserção)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: i64,
    #[schema(example = "empresa.create")]
    pub action: String,
    pub user_id: Option<Uuid>,
    pub ip: Option<String>,
    #[schema(value_type = Object)]
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

/// O que os serviços mandam gravar.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: String,
    pub user_id: Option<Uuid>,
    pub ip: Option<String>,
    pub details: Value,
}

// Parâmetros crus da URL: tudo opcional e tudo texto
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditQuery {
    pub action: Option<String>,
    pub user_id: Option<String>,
    /// Data (YYYY-MM-DD) ou data/hora RFC 3339
    pub from: Option<String>,
    /// Data (YYYY-MM-DD, inclui o dia inteiro) ou data/hora RFC 3339
    pub to: Option<String>,
    /// Busca livre dentro de `details`
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Limite superior do intervalo de datas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperBound {
    /// `created_at <= t` (veio uma data/hora)
    Inclusive(DateTime<Utc>),
    /// `created_at < t` (veio só a data: vale até o fim do dia)
    Exclusive(DateTime<Utc>),
}

/// Filtro já validado. Só os campos presentes restringem a busca.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditFilter {
    pub action: Option<String>,
    pub user_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<UpperBound>,
    pub q: Option<String>,
    pub window: PageWindow,

    // Preenchido pelo servidor a partir do token, nunca pela URL
    pub consultoria_id: Option<i32>,
}

impl AuditFilter {
    pub fn parse(query: &AuditQuery) -> Result<Self, AppError> {
        let from = match non_blank(query.from.as_deref()) {
            None => None,
            Some(raw) => Some(parse_lower_bound("from", raw)?),
        };
        let to = match non_blank(query.to.as_deref()) {
            None => None,
            Some(raw) => Some(parse_upper_bound("to", raw)?),
        };

        Ok(Self {
            action: non_blank(query.action.as_deref()).map(str::to_string),
            user_id: parse_param::<Uuid>("user_id", query.user_id.as_deref())?,
            from,
            to,
            q: non_blank(query.q.as_deref()).map(str::to_string),
            window: PageWindow::from_query(query.limit.as_deref(), query.offset.as_deref()),
            consultoria_id: None,
        })
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub(crate) fn parse_lower_bound(name: &'static str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| AppError::InvalidParameter {
            name,
            value: raw.to_string(),
        })
}

pub(crate) fn parse_upper_bound(name: &'static str, raw: &str) -> Result<UpperBound, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(UpperBound::Inclusive(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.succ_opt())
        .map(|next| UpperBound::Exclusive(start_of_day(next)))
        .ok_or_else(|| AppError::InvalidParameter {
            name,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_query_yields_empty_filter() {
        let filter = AuditFilter::parse(&AuditQuery::default()).unwrap();
        assert_eq!(filter, AuditFilter::default());
    }

    #[test]
    fn blank_strings_are_ignored() {
        let query = AuditQuery {
            action: Some("  ".into()),
            q: Some(String::new()),
            user_id: Some(" ".into()),
            ..Default::default()
        };
        let filter = AuditFilter::parse(&query).unwrap();
        assert!(filter.action.is_none());
        assert!(filter.q.is_none());
        assert!(filter.user_id.is_none());
    }

    #[test]
    fn date_only_to_covers_the_whole_day() {
        let query = AuditQuery {
            from: Some("2025-03-01".into()),
            to: Some("2025-03-31".into()),
            ..Default::default()
        };
        let filter = AuditFilter::parse(&query).unwrap();
        assert_eq!(filter.from, Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(
            filter.to,
            Some(UpperBound::Exclusive(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()))
        );
    }

    #[test]
    fn rfc3339_to_is_inclusive() {
        let query = AuditQuery {
            to: Some("2025-03-31T12:00:00-03:00".into()),
            ..Default::default()
        };
        let filter = AuditFilter::parse(&query).unwrap();
        assert_eq!(
            filter.to,
            Some(UpperBound::Inclusive(Utc.with_ymd_and_hms(2025, 3, 31, 15, 0, 0).unwrap()))
        );
    }

    #[test]
    fn invalid_user_id_is_rejected() {
        let query = AuditQuery {
            user_id: Some("não-é-uuid".into()),
            ..Default::default()
        };
        assert!(matches!(
            AuditFilter::parse(&query),
            Err(AppError::InvalidParameter { name: "user_id", .. })
        ));
    }

    #[test]
    fn limit_and_offset_are_clamped() {
        let query = AuditQuery {
            limit: Some("5000".into()),
            offset: Some("-5".into()),
            ..Default::default()
        };
        let filter = AuditFilter::parse(&query).unwrap();
        assert_eq!(filter.window, PageWindow { limit: 1000, offset: 0 });
    }
}
