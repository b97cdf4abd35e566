// src/models/consultoria.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::status::StatusRegistro;

// ---
// Consultoria (topo da hierarquia de tenants)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Consultoria {
    pub id: i32,
    #[schema(example = "Ezer Consultoria")]
    pub nome: String,
    pub cnpj: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub status: StatusRegistro,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultoriaPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub nome: String,

    #[validate(custom(function = "crate::common::validation::validate_cnpj"))]
    pub cnpj: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub telefone: Option<String>,

    #[serde(default)]
    pub status: StatusRegistro,
}
