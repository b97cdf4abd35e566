// src/handlers/avaliacoes.rs

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
        rbac::{PermAvaliacoesRead, PermAvaliacoesWrite, RequirePermission},
    },
    models::{
        auth::Actor,
        avaliacao::{Avaliacao, AvaliacaoQuery, CreateAvaliacaoPayload, MediaAvaliacao, UpdateAvaliacaoPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/avaliacoes",
    tag = "Avaliações",
    params(AvaliacaoQuery),
    responses((status = 200, description = "Avaliações, mais recentes primeiro", body = Vec<Avaliacao>)),
    security(("api_jwt" = []))
)]
pub async fn list_avaliacoes(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermAvaliacoesRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AvaliacaoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let avaliacoes = app_state
        .avaliacao_service
        .list(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(avaliacoes))
}

#[utoipa::path(
    get,
    path = "/api/avaliacoes/medias",
    tag = "Avaliações",
    params(AvaliacaoQuery),
    responses((status = 200, description = "Média das notas por colaborador", body = Vec<MediaAvaliacao>)),
    security(("api_jwt" = []))
)]
pub async fn medias(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermAvaliacoesRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AvaliacaoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let medias = app_state
        .avaliacao_service
        .medias(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(medias))
}

#[utoipa::path(
    get,
    path = "/api/avaliacoes/{id}",
    tag = "Avaliações",
    params(("id" = i32, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação", body = Avaliacao),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_avaliacao(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermAvaliacoesRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let avaliacao = app_state
        .avaliacao_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(avaliacao))
}

#[utoipa::path(
    post,
    path = "/api/avaliacoes",
    tag = "Avaliações",
    request_body = CreateAvaliacaoPayload,
    responses(
        (status = 201, description = "Avaliação registrada", body = Avaliacao),
        (status = 400, description = "Nota fora de 0 a 10")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_avaliacao(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermAvaliacoesWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateAvaliacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let avaliacao = app_state
        .avaliacao_service
        .create(&Actor::new(user, ip), &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(created(avaliacao))
}

#[utoipa::path(
    put,
    path = "/api/avaliacoes/{id}",
    tag = "Avaliações",
    params(("id" = i32, Path, description = "ID da avaliação")),
    request_body = UpdateAvaliacaoPayload,
    responses(
        (status = 200, description = "Avaliação atualizada", body = Avaliacao),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_avaliacao(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermAvaliacoesWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAvaliacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let avaliacao = app_state
        .avaliacao_service
        .update(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(avaliacao))
}

#[utoipa::path(
    delete,
    path = "/api/avaliacoes/{id}",
    tag = "Avaliações",
    params(("id" = i32, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação excluída", body = Deleted),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_avaliacao(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermAvaliacoesWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .avaliacao_service
        .delete(&Actor::new(user, ip), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(Deleted { id }))
}
