// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{error::ApiError, response::ok},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermDashboardRead, RequirePermission},
    },
    models::dashboard::DashboardStats,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores do escopo do usuário", body = DashboardStats),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermDashboardRead>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .dashboard_service
        .stats(&user)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(stats))
}
