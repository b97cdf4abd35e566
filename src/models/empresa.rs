// src/models/empresa.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::status::StatusRegistro;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Empresa {
    pub id: i32,
    pub consultoria_id: i32,

    #[schema(example = "Acme")]
    pub nome: String,

    #[schema(example = "11.111.111/0001-11")]
    pub cnpj: String,

    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub status: StatusRegistro,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// O mínimo necessário para decidir se alguém enxerga a empresa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct EmpresaRef {
    pub id: i32,
    pub consultoria_id: i32,
}

// Usado tanto no POST quanto no PUT (substituição completa dos campos editáveis)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmpresaPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Acme")]
    pub nome: String,

    #[validate(custom(function = "crate::common::validation::validate_cnpj"))]
    #[schema(example = "11.111.111/0001-11")]
    pub cnpj: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub telefone: Option<String>,
    pub endereco: Option<String>,

    #[serde(default)]
    pub status: StatusRegistro,
}

// Indicadores de uma empresa
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmpresaEstatisticas {
    pub empresa_id: i32,
    pub departamentos: i64,
    pub colaboradores_ativos: i64,
    pub colaboradores_inativos: i64,
    pub lideres: i64,
    pub pdis_em_andamento: i64,
}
