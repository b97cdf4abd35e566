// src/models/feedback.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    db_utils::{non_blank, parse_param, PageWindow},
    error::AppError,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i32,
    pub avaliado_id: i32,
    pub avaliador_id: Option<i32>,
    #[schema(example = "Positivo")]
    pub classificacao: String,
    pub data: NaiveDate,
    pub observacoes: Option<String>,

    pub empresa_id: i32,
    pub avaliado_nome: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackPayload {
    pub avaliado_id: i32,
    pub avaliador_id: Option<i32>,

    #[validate(length(min = 1, max = 50, message = "A classificação é obrigatória (até 50 caracteres)."))]
    pub classificacao: String,

    pub data: Option<NaiveDate>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackPayload {
    pub avaliador_id: Option<i32>,

    #[validate(length(min = 1, max = 50, message = "A classificação é obrigatória (até 50 caracteres)."))]
    pub classificacao: String,

    pub data: NaiveDate,
    pub observacoes: Option<String>,
}

// Parâmetros crus da listagem
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FeedbackQuery {
    pub empresa_id: Option<String>,
    pub avaliado_id: Option<String>,
    pub avaliador_id: Option<String>,
    pub classificacao: Option<String>,
    /// YYYY-MM-DD, inclusivo
    pub from: Option<String>,
    /// YYYY-MM-DD, inclusivo
    pub to: Option<String>,
    /// Busca livre nas observações
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedbackFilter {
    pub empresa_id: Option<i32>,
    pub avaliado_id: Option<i32>,
    pub avaliador_id: Option<i32>,
    pub classificacao: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub q: Option<String>,
    pub window: PageWindow,
}

impl FeedbackFilter {
    pub fn parse(query: &FeedbackQuery) -> Result<Self, AppError> {
        Ok(Self {
            empresa_id: parse_param("empresaId", query.empresa_id.as_deref())?,
            avaliado_id: parse_param("avaliadoId", query.avaliado_id.as_deref())?,
            avaliador_id: parse_param("avaliadorId", query.avaliador_id.as_deref())?,
            classificacao: non_blank(query.classificacao.as_deref()).map(str::to_string),
            from: parse_param("from", query.from.as_deref())?,
            to: parse_param("to", query.to.as_deref())?,
            q: non_blank(query.q.as_deref()).map(str::to_string),
            window: PageWindow::from_query(query.limit.as_deref(), query.offset.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_values() {
        let query = FeedbackQuery {
            avaliado_id: Some("12".into()),
            classificacao: Some("Positivo".into()),
            from: Some("2025-01-01".into()),
            ..Default::default()
        };
        let filter = FeedbackFilter::parse(&query).unwrap();
        assert_eq!(filter.avaliado_id, Some(12));
        assert_eq!(filter.classificacao.as_deref(), Some("Positivo"));
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(filter.to, None);
    }

    #[test]
    fn bad_date_is_a_parameter_error() {
        let query = FeedbackQuery {
            to: Some("31/12/2025".into()),
            ..Default::default()
        };
        assert!(matches!(
            FeedbackFilter::parse(&query),
            Err(AppError::InvalidParameter { name: "to", .. })
        ));
    }
}
