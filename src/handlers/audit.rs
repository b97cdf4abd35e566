// src/handlers/audit.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{db_utils::Page, error::ApiError, extract::Query, response::ok},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermAuditRead, RequirePermission},
    },
    models::audit::{AuditLog, AuditQuery},
};

// GET /api/audit-logs
// Sem parâmetros devolve as entradas mais recentes (limit padrão 100).
#[utoipa::path(
    get,
    path = "/api/audit-logs",
    tag = "Auditoria",
    params(AuditQuery),
    responses(
        (status = 200, description = "Página do log de auditoria", body = Page<AuditLog>),
        (status = 400, description = "user_id, from ou to mal formatados"),
        (status = 403, description = "Perfil sem acesso ao log")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermAuditRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .audit_service
        .search(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(page))
}
