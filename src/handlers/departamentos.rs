// src/handlers/departamentos.rs

use axum::{extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{Json, Path, Query},
        response::{created, ok, Deleted},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        client_ip::ClientIp,
        i18n::Locale,
        rbac::{PermCadastrosRead, PermCadastrosWrite, RequirePermission},
    },
    models::{
        auth::Actor,
        departamento::{CreateDepartamentoPayload, Departamento, DepartamentoQuery, UpdateDepartamentoPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/departamentos",
    tag = "Departamentos",
    params(DepartamentoQuery),
    responses((status = 200, description = "Departamentos visíveis", body = Vec<Departamento>)),
    security(("api_jwt" = []))
)]
pub async fn list_departamentos(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DepartamentoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let departamentos = app_state
        .departamento_service
        .list(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(departamentos))
}

#[utoipa::path(
    get,
    path = "/api/departamentos/{id}",
    tag = "Departamentos",
    params(("id" = i32, Path, description = "ID do departamento")),
    responses(
        (status = 200, description = "Departamento", body = Departamento),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_departamento(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let departamento = app_state
        .departamento_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(departamento))
}

#[utoipa::path(
    post,
    path = "/api/departamentos",
    tag = "Departamentos",
    request_body = CreateDepartamentoPayload,
    responses(
        (status = 201, description = "Departamento criado", body = Departamento),
        (status = 409, description = "Nome repetido na empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_departamento(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateDepartamentoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let departamento = app_state
        .departamento_service
        .create(&Actor::new(user, ip), &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(created(departamento))
}

#[utoipa::path(
    put,
    path = "/api/departamentos/{id}",
    tag = "Departamentos",
    params(("id" = i32, Path, description = "ID do departamento")),
    request_body = UpdateDepartamentoPayload,
    responses(
        (status = 200, description = "Departamento atualizado", body = Departamento),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_departamento(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDepartamentoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let departamento = app_state
        .departamento_service
        .update(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(departamento))
}

#[utoipa::path(
    delete,
    path = "/api/departamentos/{id}",
    tag = "Departamentos",
    params(("id" = i32, Path, description = "ID do departamento")),
    responses(
        (status = 200, description = "Departamento excluído", body = Deleted),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_departamento(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .departamento_service
        .delete(&Actor::new(user, ip), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(Deleted { id }))
}
