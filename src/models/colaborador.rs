// src/models/colaborador.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::status::StatusRegistro;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Colaborador {
    pub id: i32,
    pub empresa_id: i32,
    #[schema(example = "Maria da Silva")]
    pub nome: String,
    pub email: Option<String>,
    #[schema(example = "Analista de RH")]
    pub cargo: Option<String>,
    pub data_admissao: Option<NaiveDate>,
    pub status: StatusRegistro,

    // Vem de colaborador_departamentos (N:N)
    pub departamento_ids: Vec<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateColaboradorPayload {
    pub empresa_id: i32,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub cargo: Option<String>,
    pub data_admissao: Option<NaiveDate>,

    #[serde(default)]
    pub status: StatusRegistro,

    #[serde(default)]
    pub departamento_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColaboradorPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub cargo: Option<String>,
    pub data_admissao: Option<NaiveDate>,

    #[serde(default)]
    pub status: StatusRegistro,

    #[serde(default)]
    pub departamento_ids: Vec<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ColaboradorQuery {
    pub empresa_id: Option<i32>,
    pub departamento_id: Option<i32>,
    pub status: Option<StatusRegistro>,
    /// Busca por nome ou e-mail
    pub q: Option<String>,
}

// Contagem global de ativos/inativos (dentro do escopo de quem pergunta)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContagemStatus {
    pub ativos: i64,
    pub inativos: i64,
}
