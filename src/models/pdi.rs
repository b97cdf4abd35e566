// src/models/pdi.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::status::PdiStatus;

// Plano de Desenvolvimento Individual
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pdi {
    pub id: i32,
    pub colaborador_id: i32,
    #[schema(example = "Assumir a coordenação do time")]
    pub objetivo: String,
    pub acoes: Option<String>,
    pub prazo: NaiveDate,
    pub status: PdiStatus,

    pub empresa_id: i32,
    pub colaborador_nome: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePdiPayload {
    pub colaborador_id: i32,

    #[validate(length(min = 3, message = "O objetivo deve ter no mínimo 3 caracteres."))]
    pub objetivo: String,

    pub acoes: Option<String>,
    pub prazo: NaiveDate,

    #[serde(default)]
    pub status: PdiStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePdiPayload {
    #[validate(length(min = 3, message = "O objetivo deve ter no mínimo 3 caracteres."))]
    pub objetivo: String,

    pub acoes: Option<String>,
    pub prazo: NaiveDate,
    pub status: PdiStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PdiQuery {
    pub empresa_id: Option<i32>,
    pub colaborador_id: Option<i32>,
    pub status: Option<PdiStatus>,
}

pub const DEFAULT_DIAS_PRAZO: i32 = 30;
pub const MAX_DIAS_PRAZO: i32 = 365;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PrazoQuery {
    /// Janela, em dias, para "próximos do prazo" (padrão 30)
    pub dias: Option<i32>,
}

impl PrazoQuery {
    pub fn dias(&self) -> i32 {
        self.dias.unwrap_or(DEFAULT_DIAS_PRAZO).clamp(0, MAX_DIAS_PRAZO)
    }
}

// PDIs em andamento que vencem em breve ou já venceram
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PdiPrazos {
    pub dias: i32,
    pub proximos_do_prazo: Vec<Pdi>,
    pub atrasados: Vec<Pdi>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prazo_window_is_bounded() {
        assert_eq!(PrazoQuery::default().dias(), DEFAULT_DIAS_PRAZO);
        assert_eq!(PrazoQuery { dias: Some(-3) }.dias(), 0);
        assert_eq!(PrazoQuery { dias: Some(10_000) }.dias(), MAX_DIAS_PRAZO);
    }
}
