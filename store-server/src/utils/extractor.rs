//! JSON body extractor with unified error responses

use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use axum::Json;

use super::AppError;

/// Like [`Json`], but a malformed body becomes an [`AppError`] with the
/// usual `{code, message, error}` shape instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::invalid_format(rejection.body_text())),
        }
    }
}
