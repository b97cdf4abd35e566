// src/common/response.rs

use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

// Envelope padrão de sucesso: { success, data, error }
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::OK, Json(ApiResponse::new(data)))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::new(data)))
}

/// Resposta das exclusões: só o id removido.
#[derive(Debug, Serialize, ToSchema)]
pub struct Deleted {
    pub id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let body = serde_json::to_value(ApiResponse::new(Deleted { id: 3 })).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": { "id": 3 }, "error": null }));
    }
}
