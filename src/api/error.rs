use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::feed::generator::GenerateError;
use crate::core::feed::render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("unknown store: {0}")]
    UnknownStore(String),
    #[error("failed to generate feed: {0}")]
    Generate(#[from] GenerateError),
    #[error("failed to render feed: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::UnknownStore(_) => StatusCode::NOT_FOUND.into_response(),
            error @ (ApiError::Generate(_) | ApiError::Render(_)) => {
                tracing::error!(%error, "Failed to serve feed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
