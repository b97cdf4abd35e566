// src/handlers/empresas.rs

use axum::{extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{Json, Path},
        response::{created, ok, Deleted},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        client_ip::ClientIp,
        i18n::Locale,
        rbac::{PermEmpresasCreate, PermEmpresasDelete, PermEmpresasRead, PermEmpresasUpdate, RequirePermission},
    },
    models::{
        auth::Actor,
        empresa::{Empresa, EmpresaEstatisticas, EmpresaPayload},
    },
};

// GET /api/empresas
#[utoipa::path(
    get,
    path = "/api/empresas",
    tag = "Empresas",
    responses((status = 200, description = "Empresas visíveis para o perfil", body = Vec<Empresa>)),
    security(("api_jwt" = []))
)]
pub async fn list_empresas(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermEmpresasRead>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let empresas = app_state
        .empresa_service
        .list(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(empresas))
}

// GET /api/empresas/{id}
#[utoipa::path(
    get,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = i32, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa", body = Empresa),
        (status = 403, description = "Fora do escopo"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermEmpresasRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let empresa = app_state
        .empresa_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(empresa))
}

// GET /api/empresas/{id}/estatisticas
#[utoipa::path(
    get,
    path = "/api/empresas/{id}/estatisticas",
    tag = "Empresas",
    params(("id" = i32, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Indicadores da empresa", body = EmpresaEstatisticas),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_estatisticas(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermEmpresasRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .empresa_service
        .estatisticas(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(stats))
}

// POST /api/empresas (só consultoria)
#[utoipa::path(
    post,
    path = "/api/empresas",
    tag = "Empresas",
    request_body = EmpresaPayload,
    responses(
        (status = 201, description = "Empresa criada", body = Empresa),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Perfil sem permissão"),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermEmpresasCreate>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Json(payload): Json<EmpresaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let empresa = app_state
        .empresa_service
        .create(&Actor::new(user, ip), &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(created(empresa))
}

// PUT /api/empresas/{id}
#[utoipa::path(
    put,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = i32, Path, description = "ID da empresa")),
    request_body = EmpresaPayload,
    responses(
        (status = 200, description = "Empresa atualizada", body = Empresa),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrada"),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermEmpresasUpdate>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<EmpresaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let empresa = app_state
        .empresa_service
        .update(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(empresa))
}

// DELETE /api/empresas/{id} (só consultoria)
#[utoipa::path(
    delete,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = i32, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa excluída", body = Deleted),
        (status = 403, description = "Perfil sem permissão"),
        (status = 404, description = "Não encontrada"),
        (status = 409, description = "Há registros vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_empresa(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermEmpresasDelete>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .empresa_service
        .delete(&Actor::new(user, ip), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(Deleted { id }))
}
