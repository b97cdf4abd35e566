// src/handlers/colaboradores.rs

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
        colaborador::{
            Colaborador, ColaboradorQuery, ContagemStatus, CreateColaboradorPayload, UpdateColaboradorPayload,
        },
    },
};

#[utoipa::path(
    get,
    path = "/api/colaboradores",
    tag = "Colaboradores",
    params(ColaboradorQuery),
    responses((status = 200, description = "Colaboradores visíveis", body = Vec<Colaborador>)),
    security(("api_jwt" = []))
)]
pub async fn list_colaboradores(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ColaboradorQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let colaboradores = app_state
        .colaborador_service
        .list(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(colaboradores))
}

// Ativos x inativos dentro do escopo
#[utoipa::path(
    get,
    path = "/api/colaboradores/contagem-status",
    tag = "Colaboradores",
    responses((status = 200, description = "Contagem por status", body = ContagemStatus)),
    security(("api_jwt" = []))
)]
pub async fn contagem_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosRead>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let contagem = app_state
        .colaborador_service
        .contagem_status(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(contagem))
}

#[utoipa::path(
    get,
    path = "/api/colaboradores/{id}",
    tag = "Colaboradores",
    params(("id" = i32, Path, description = "ID do colaborador")),
    responses(
        (status = 200, description = "Colaborador", body = Colaborador),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_colaborador(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let colaborador = app_state
        .colaborador_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(colaborador))
}

#[utoipa::path(
    post,
    path = "/api/colaboradores",
    tag = "Colaboradores",
    request_body = CreateColaboradorPayload,
    responses(
        (status = 201, description = "Colaborador criado", body = Colaborador),
        (status = 400, description = "Dados inválidos ou departamento de outra empresa"),
        (status = 409, description = "E-mail repetido na empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_colaborador(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateColaboradorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let colaborador = app_state
        .colaborador_service
        .create(&Actor::new(user, ip), &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(created(colaborador))
}

#[utoipa::path(
    put,
    path = "/api/colaboradores/{id}",
    tag = "Colaboradores",
    params(("id" = i32, Path, description = "ID do colaborador")),
    request_body = UpdateColaboradorPayload,
    responses(
        (status = 200, description = "Colaborador atualizado", body = Colaborador),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_colaborador(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateColaboradorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let colaborador = app_state
        .colaborador_service
        .update(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(colaborador))
}

#[utoipa::path(
    delete,
    path = "/api/colaboradores/{id}",
    tag = "Colaboradores",
    params(("id" = i32, Path, description = "ID do colaborador")),
    responses(
        (status = 200, description = "Colaborador excluído", body = Deleted),
        (status = 409, description = "Há avaliações, PDIs ou outros registros vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_colaborador(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermCadastrosWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .colaborador_service
        .delete(&Actor::new(user, ip), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(Deleted { id }))
}
