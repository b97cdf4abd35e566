// src/handlers/health.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use utoipa::OpenApi;

use crate::{
    common::response::{ok, ApiResponse},
    config::AppState,
    docs::ApiDoc,
};

// GET /api/health: responde mesmo com o banco fora, mas avisa
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Servidor e banco respondendo"),
        (status = 503, description = "Banco indisponível")
    )
)]
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => ok(json!({ "status": "ok", "database": "ok" })),
        Err(e) => {
            tracing::warn!(error = %e, "health check sem banco");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    success: false,
                    data: json!({ "status": "degraded", "database": "unavailable" }),
                    error: Some("Banco de dados indisponível".to_string()),
                }),
            )
        }
    }
}

// GET /api/docs/openapi.json
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
