// src/handlers/consultorias.rs

use axum::{extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{Json, Path},
        response::ok,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        client_ip::ClientIp,
        i18n::Locale,
        rbac::{PermConsultoriasManage, RequirePermission},
    },
    models::{
        auth::Actor,
        consultoria::{Consultoria, UpdateConsultoriaPayload},
    },
};

// GET /api/consultorias
#[utoipa::path(
    get,
    path = "/api/consultorias",
    tag = "Consultorias",
    responses(
        (status = 200, description = "A consultoria do usuário logado", body = Vec<Consultoria>),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_consultorias(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermConsultoriasManage>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let consultorias = app_state
        .consultoria_service
        .list(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(consultorias))
}

// GET /api/consultorias/{id}
#[utoipa::path(
    get,
    path = "/api/consultorias/{id}",
    tag = "Consultorias",
    params(("id" = i32, Path, description = "ID da consultoria")),
    responses(
        (status = 200, description = "Consultoria", body = Consultoria),
        (status = 403, description = "Outra consultoria"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_consultoria(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermConsultoriasManage>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let consultoria = app_state
        .consultoria_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(consultoria))
}

// PUT /api/consultorias/{id}
#[utoipa::path(
    put,
    path = "/api/consultorias/{id}",
    tag = "Consultorias",
    params(("id" = i32, Path, description = "ID da consultoria")),
    request_body = UpdateConsultoriaPayload,
    responses(
        (status = 200, description = "Consultoria atualizada", body = Consultoria),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_consultoria(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermConsultoriasManage>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateConsultoriaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let consultoria = app_state
        .consultoria_service
        .update(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(consultoria))
}

// DELETE /api/consultorias/{id} (exclusão lógica)
#[utoipa::path(
    delete,
    path = "/api/consultorias/{id}",
    tag = "Consultorias",
    params(("id" = i32, Path, description = "ID da consultoria")),
    responses(
        (status = 200, description = "Consultoria inativada", body = Consultoria),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_consultoria(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermConsultoriasManage>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let consultoria = app_state
        .consultoria_service
        .delete(&Actor::new(user, ip), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(consultoria))
}
