// src/handlers/lideres.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{
        error::ApiError,
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
        lider::{CreateLiderPayload, Lider, LiderQuery, SetDepartamentosPayload, SetMembrosPayload, UpdateLiderPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/lideres",
    tag = "Líderes",
    params(LiderQuery),
    responses((status = 200, description = "Líderes visíveis", body = Vec<Lider>)),
    security(("api_jwt" = []))
)]
pub async fn list_lideres(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<LiderQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let lideres = app_state
        .lider_service
        .list(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(lideres))
}

#[utoipa::path(
    get,
    path = "/api/lideres/{id}",
    tag = "Líderes",
    params(("id" = i32, Path, description = "ID do líder")),
    responses(
        (status = 200, description = "Líder com equipe e departamentos", body = Lider),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lider(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let lider = app_state
        .lider_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(lider))
}

#[utoipa::path(
    post,
    path = "/api/lideres",
    tag = "Líderes",
    request_body = CreateLiderPayload,
    responses(
        (status = 201, description = "Líder criado", body = Lider),
        (status = 400, description = "Colaborador, membro ou departamento de outra empresa"),
        (status = 409, description = "Colaborador já é líder")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lider(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateLiderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lider = app_state
        .lider_service
        .create(&Actor::new(user, ip), &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(created(lider))
}

#[utoipa::path(
    put,
    path = "/api/lideres/{id}",
    tag = "Líderes",
    params(("id" = i32, Path, description = "ID do líder")),
    request_body = UpdateLiderPayload,
    responses(
        (status = 200, description = "Líder atualizado", body = Lider),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lider(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLiderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lider = app_state
        .lider_service
        .update(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(lider))
}

// PUT /api/lideres/{id}/membros: substitui a equipe inteira
#[utoipa::path(
    put,
    path = "/api/lideres/{id}/membros",
    tag = "Líderes",
    params(("id" = i32, Path, description = "ID do líder")),
    request_body = SetMembrosPayload,
    responses(
        (status = 200, description = "Equipe atualizada", body = Lider),
        (status = 400, description = "Colaborador de outra empresa ou o próprio líder")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_membros(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<SetMembrosPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lider = app_state
        .lider_service
        .set_membros(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(lider))
}

#[utoipa::path(
    put,
    path = "/api/lideres/{id}/departamentos",
    tag = "Líderes",
    params(("id" = i32, Path, description = "ID do líder")),
    request_body = SetDepartamentosPayload,
    responses(
        (status = 200, description = "Departamentos atualizados", body = Lider),
        (status = 400, description = "Departamento de outra empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_departamentos(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<SetDepartamentosPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lider = app_state
        .lider_service
        .set_departamentos(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(lider))
}

#[utoipa::path(
    delete,
    path = "/api/lideres/{id}",
    tag = "Líderes",
    params(("id" = i32, Path, description = "ID do líder")),
    responses(
        (status = 200, description = "Líder excluído", body = Deleted),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lider(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .lider_service
        .delete(&Actor::new(user, ip), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(Deleted { id }))
}
