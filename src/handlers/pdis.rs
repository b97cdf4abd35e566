// src/handlers/pdis.rs

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
        rbac::{PermPdisRead, PermPdisWrite, RequirePermission},
    },
    models::{
        auth::Actor,
        pdi::{CreatePdiPayload, Pdi, PdiPrazos, PdiQuery, PrazoQuery, UpdatePdiPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/pdis",
    tag = "PDIs",
    params(PdiQuery),
    responses((status = 200, description = "PDIs por prazo", body = Vec<Pdi>)),
    security(("api_jwt" = []))
)]
pub async fn list_pdis(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermPdisRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<PdiQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pdis = app_state
        .pdi_service
        .list(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(pdis))
}

#[utoipa::path(
    get,
    path = "/api/pdis/prazos",
    tag = "PDIs",
    params(PrazoQuery),
    responses((status = 200, description = "PDIs perto do prazo e atrasados", body = PdiPrazos)),
    security(("api_jwt" = []))
)]
pub async fn prazos(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermPdisRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<PrazoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let prazos = app_state
        .pdi_service
        .prazos(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(prazos))
}

#[utoipa::path(
    get,
    path = "/api/pdis/{id}",
    tag = "PDIs",
    params(("id" = i32, Path, description = "ID do PDI")),
    responses(
        (status = 200, description = "PDI", body = Pdi),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_pdi(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermPdisRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let pdi = app_state
        .pdi_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(pdi))
}

#[utoipa::path(
    post,
    path = "/api/pdis",
    tag = "PDIs",
    request_body = CreatePdiPayload,
    responses((status = 201, description = "PDI criado", body = Pdi)),
    security(("api_jwt" = []))
)]
pub async fn create_pdi(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermPdisWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreatePdiPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let pdi = app_state
        .pdi_service
        .create(&Actor::new(user, ip), &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(created(pdi))
}

#[utoipa::path(
    put,
    path = "/api/pdis/{id}",
    tag = "PDIs",
    params(("id" = i32, Path, description = "ID do PDI")),
    request_body = UpdatePdiPayload,
    responses(
        (status = 200, description = "PDI atualizado", body = Pdi),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_pdi(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermPdisWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePdiPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let pdi = app_state
        .pdi_service
        .update(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(pdi))
}

#[utoipa::path(
    delete,
    path = "/api/pdis/{id}",
    tag = "PDIs",
    params(("id" = i32, Path, description = "ID do PDI")),
    responses(
        (status = 200, description = "PDI excluído", body = Deleted),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_pdi(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermPdisWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .pdi_service
        .delete(&Actor::new(user, ip), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(Deleted { id }))
}
