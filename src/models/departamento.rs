// src/models/departamento.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::status::StatusRegistro;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Departamento {
    pub id: i32,
    pub empresa_id: i32,
    #[schema(example = "Recursos Humanos")]
    pub nome: String,
    pub descricao: Option<String>,
    pub status: StatusRegistro,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartamentoPayload {
    pub empresa_id: i32,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    pub descricao: Option<String>,

    #[serde(default)]
    pub status: StatusRegistro,
}

// A empresa do departamento não muda depois de criado
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartamentoPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    pub descricao: Option<String>,

    #[serde(default)]
    pub status: StatusRegistro,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DepartamentoQuery {
    pub empresa_id: Option<i32>,
}
