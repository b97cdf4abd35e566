use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

/// Em qual tipo de operação a violação de FK aconteceu.
/// Numa exclusão significa "existem registros vinculados";
/// numa escrita significa "a referência informada não existe".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOperation {
    Write,
    Delete,
}

// Conjunto fechado de erros da aplicação.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Parâmetro inválido: {name}={value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Conflito: {entity}.{field} = '{value}' já existe")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{entity} {id} não encontrado(a)")]
    NotFound { entity: &'static str, id: String },

    #[error("Violação de chave estrangeira em {entity} ({operation:?})")]
    ForeignKeyViolation {
        entity: &'static str,
        operation: DbOperation,
    },

    #[error("Acesso negado: {permission}")]
    Forbidden { permission: String },

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` guarda o contexto de erros inesperados
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(permission: impl Into<String>) -> Self {
        AppError::Forbidden {
            permission: permission.into(),
        }
    }

    /// Código estável enviado ao cliente junto com a mensagem traduzida.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::InvalidParameter { .. } => "invalid_parameter",
            AppError::Conflict { .. } => "conflict",
            AppError::NotFound { .. } => "not_found",
            AppError::ForeignKeyViolation {
                operation: DbOperation::Delete,
                ..
            } => "linked_records",
            AppError::ForeignKeyViolation {
                operation: DbOperation::Write,
                ..
            } => "missing_reference",
            AppError::Forbidden { .. } => "forbidden",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Conflict { .. } | AppError::ForeignKeyViolation { .. } => {
                StatusCode::CONFLICT
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro interno na resposta HTTP, já no idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();
        let code = self.code();

        let (error, details) = match &self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (store.translate(lang, code, &[]), Some(json!(details)))
            }
            AppError::InvalidParameter { name, value } => (
                store.translate(lang, code, &[("name", *name), ("value", value.as_str())]),
                None,
            ),
            AppError::Conflict {
                entity,
                field,
                value,
            } => {
                let entity = store.entity_label(lang, entity);
                let field = store.field_label(lang, field);
                (
                    store.translate(
                        lang,
                        code,
                        &[
                            ("entity", entity.as_str()),
                            ("field", field.as_str()),
                            ("value", value.as_str()),
                        ],
                    ),
                    None,
                )
            }
            AppError::NotFound { entity, id } => {
                let entity = store.entity_label(lang, entity);
                (
                    store.translate(lang, code, &[("entity", entity.as_str()), ("id", id.as_str())]),
                    None,
                )
            }
            AppError::ForeignKeyViolation { entity, .. } => {
                let entity = store.entity_label(lang, entity);
                (store.translate(lang, code, &[("entity", entity.as_str())]), None)
            }
            AppError::Forbidden { permission } => (
                store.translate(lang, code, &[("permission", permission.as_str())]),
                None,
            ),
            AppError::InvalidCredentials | AppError::InvalidToken => {
                (store.translate(lang, code, &[]), None)
            }
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (store.translate(lang, code, &[]), None)
            }
        };

        ApiError {
            status,
            code,
            error,
            details,
        }
    }
}

// O erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "data": null,
            "error": self.error,
            "code": self.code,
            "details": self.details,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    #[test]
    fn conflict_maps_to_409_with_localized_message() {
        let store = I18nStore::new();
        let err = AppError::Conflict {
            entity: "empresa",
            field: "cnpj",
            value: "11.111.111/0001-11".to_string(),
        };
        let api = err.to_api_error(&pt(), &store);

        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.code, "conflict");
        assert!(api.error.contains("CNPJ"));
        assert!(api.error.contains("11.111.111/0001-11"));
    }

    #[test]
    fn foreign_key_code_depends_on_operation() {
        let delete = AppError::ForeignKeyViolation {
            entity: "empresa",
            operation: DbOperation::Delete,
        };
        let write = AppError::ForeignKeyViolation {
            entity: "departamento",
            operation: DbOperation::Write,
        };
        assert_eq!(delete.code(), "linked_records");
        assert_eq!(write.code(), "missing_reference");
        assert_eq!(delete.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let store = I18nStore::new();
        let err = AppError::InternalServerError(anyhow::anyhow!("senha do banco: 1234"));
        let api = err.to_api_error(&Locale("en".to_string()), &store);

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("1234"));
    }

    #[test]
    fn validation_errors_are_listed_per_field() {
        let store = I18nStore::new();
        let mut errors = validator::ValidationErrors::new();
        let mut e = validator::ValidationError::new("length");
        e.message = Some("O nome é obrigatório.".into());
        errors.add("nome", e);

        let api = AppError::ValidationError(errors).to_api_error(&pt(), &store);
        let details = api.details.expect("details");
        assert_eq!(details["nome"][0], "O nome é obrigatório.");
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
    }
}
