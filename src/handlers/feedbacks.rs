// src/handlers/feedbacks.rs

use axum::{extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    common::{
        db_utils::Page,
        error::{ApiError, AppError},
        extract::{Json, Path, Query},
        response::{created, ok, Deleted},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        client_ip::ClientIp,
        i18n::Locale,
        rbac::{PermFeedbacksRead, PermFeedbacksWrite, RequirePermission},
    },
    models::{
        auth::Actor,
        feedback::{CreateFeedbackPayload, Feedback, FeedbackQuery, UpdateFeedbackPayload},
    },
};

// GET /api/feedbacks: paginado ({ items, limit, offset })
#[utoipa::path(
    get,
    path = "/api/feedbacks",
    tag = "Feedbacks",
    params(FeedbackQuery),
    responses(
        (status = 200, description = "Página de feedbacks, mais recentes primeiro", body = Page<Feedback>),
        (status = 400, description = "Parâmetro inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_feedbacks(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermFeedbacksRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<FeedbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .feedback_service
        .search(&user, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(page))
}

#[utoipa::path(
    get,
    path = "/api/feedbacks/{id}",
    tag = "Feedbacks",
    params(("id" = i32, Path, description = "ID do feedback")),
    responses(
        (status = 200, description = "Feedback", body = Feedback),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermFeedbacksRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let feedback = app_state
        .feedback_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(feedback))
}

#[utoipa::path(
    post,
    path = "/api/feedbacks",
    tag = "Feedbacks",
    request_body = CreateFeedbackPayload,
    responses((status = 201, description = "Feedback registrado", body = Feedback)),
    security(("api_jwt" = []))
)]
pub async fn create_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermFeedbacksWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateFeedbackPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let feedback = app_state
        .feedback_service
        .create(&Actor::new(user, ip), &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(created(feedback))
}

#[utoipa::path(
    put,
    path = "/api/feedbacks/{id}",
    tag = "Feedbacks",
    params(("id" = i32, Path, description = "ID do feedback")),
    request_body = UpdateFeedbackPayload,
    responses(
        (status = 200, description = "Feedback atualizado", body = Feedback),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermFeedbacksWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFeedbackPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let feedback = app_state
        .feedback_service
        .update(&Actor::new(user, ip), id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(feedback))
}

#[utoipa::path(
    delete,
    path = "/api/feedbacks/{id}",
    tag = "Feedbacks",
    params(("id" = i32, Path, description = "ID do feedback")),
    responses(
        (status = 200, description = "Feedback excluído", body = Deleted),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_feedback(
    State(app_state): State<AppState>,
    locale: Locale,
    _perm: RequirePermission<PermFeedbacksWrite>,
    AuthenticatedUser(user): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .feedback_service
        .delete(&Actor::new(user, ip), id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(Deleted { id }))
}
