// src/models/avaliacao.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Avaliacao {
    pub id: i32,
    pub colaborador_id: i32,
    pub avaliador_id: Option<i32>,
    #[schema(value_type = f64, example = 8.5)]
    pub nota: Decimal,
    #[schema(example = "Desempenho")]
    pub tipo: String,
    pub data: NaiveDate,
    pub observacoes: Option<String>,

    // Vindos do JOIN com colaboradores
    pub empresa_id: i32,
    pub colaborador_nome: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvaliacaoPayload {
    pub colaborador_id: i32,
    pub avaliador_id: Option<i32>,

    #[validate(custom(function = "crate::common::validation::validate_nota"))]
    #[schema(value_type = f64, example = 8.5)]
    pub nota: Decimal,

    #[validate(length(min = 1, message = "O tipo é obrigatório."))]
    pub tipo: String,

    /// Se omitida, vale a data de hoje
    pub data: Option<NaiveDate>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvaliacaoPayload {
    pub avaliador_id: Option<i32>,

    #[validate(custom(function = "crate::common::validation::validate_nota"))]
    #[schema(value_type = f64, example = 8.5)]
    pub nota: Decimal,

    #[validate(length(min = 1, message = "O tipo é obrigatório."))]
    pub tipo: String,

    pub data: NaiveDate,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvaliacaoQuery {
    pub empresa_id: Option<i32>,
    pub colaborador_id: Option<i32>,
    pub tipo: Option<String>,
}

// Média das notas por colaborador
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaAvaliacao {
    pub colaborador_id: i32,
    pub colaborador_nome: String,
    #[schema(value_type = Option<f64>)]
    pub media: Option<Decimal>,
    pub total: i64,
}
