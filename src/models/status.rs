// src/models/status.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Mapeia o CREATE TYPE status_registro do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_registro")]
pub enum StatusRegistro {
    #[default]
    Ativo,
    Inativo,
}

// Mapeia o CREATE TYPE pdi_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pdi_status")]
pub enum PdiStatus {
    #[default]
    #[sqlx(rename = "Em Andamento")]
    #[serde(rename = "Em Andamento")]
    EmAndamento,

    #[sqlx(rename = "Concluído")]
    #[serde(rename = "Concluído")]
    Concluido,

    Cancelado,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdi_status_uses_display_labels_on_the_wire() {
        assert_eq!(serde_json::to_string(&PdiStatus::EmAndamento).unwrap(), "\"Em Andamento\"");
        assert_eq!(serde_json::to_string(&PdiStatus::Concluido).unwrap(), "\"Concluído\"");
        let parsed: PdiStatus = serde_json::from_str("\"Cancelado\"").unwrap();
        assert_eq!(parsed, PdiStatus::Cancelado);
    }

    #[test]
    fn status_defaults_to_ativo() {
        assert_eq!(StatusRegistro::default(), StatusRegistro::Ativo);
    }
}
