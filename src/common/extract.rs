// src/common/extract.rs

// Versões locais de Json, Query e Path: a rejeição do axum vira o
// envelope { success: false, ... } no idioma do cliente, e não texto puro.

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

fn rejected<S>(name: &'static str, detail: String, locale: &Locale, state: &S) -> ApiError
where
    AppState: FromRef<S>,
{
    tracing::debug!(parametro = name, %detail, "requisição recusada na extração");
    let app_state = AppState::from_ref(state);
    AppError::InvalidParameter { name, value: detail }.to_api_error(locale, &app_state.i18n_store)
}

/// Corpo JSON. Deve ser o último extrator do handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(req.headers());
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(rejected("body", rejection.body_text(), &locale, state)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => {
                let locale = Locale::from_headers(&parts.headers);
                Err(rejected("query", rejection.body_text(), &locale, state))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(rejection) => {
                let locale = Locale::from_headers(&parts.headers);
                Err(rejected("path", rejection.body_text(), &locale, state))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{self, StatusCode}};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Filtro {
        limite: i32,
    }

    #[tokio::test]
    async fn bad_query_string_becomes_invalid_parameter() {
        let state = crate::routes::tests::test_state();
        let (mut parts, _) = http::Request::builder()
            .uri("/x?limite=muito")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let err = Query::<Filtro>::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "invalid_parameter");
    }

    #[tokio::test]
    async fn json_without_content_type_is_rejected_as_body() {
        let state = crate::routes::tests::test_state();
        let req = http::Request::builder().body(Body::from(r#"{"limite":1}"#)).unwrap();

        let err = Json::<Filtro>::from_request(req, &state).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.contains("body"));
    }
}
