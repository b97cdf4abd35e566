// src/models/lider.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::status::StatusRegistro;

// ---
// Líder: um colaborador que responde por outros colaboradores e departamentos
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lider {
    pub id: i32,
    pub colaborador_id: i32,
    pub empresa_id: i32,
    pub status: StatusRegistro,

    pub colaborador_nome: String,
    pub membro_ids: Vec<i32>,
    pub departamento_ids: Vec<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLiderPayload {
    pub empresa_id: i32,
    pub colaborador_id: i32,

    #[serde(default)]
    pub membro_ids: Vec<i32>,

    #[serde(default)]
    pub departamento_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLiderPayload {
    pub colaborador_id: i32,

    #[serde(default)]
    pub status: StatusRegistro,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetMembrosPayload {
    pub colaborador_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetDepartamentosPayload {
    pub departamento_ids: Vec<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LiderQuery {
    pub empresa_id: Option<i32>,
}
