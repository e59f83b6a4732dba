pub mod feed;
pub mod home;
pub mod stats;
pub mod verify;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Convert anyhow errors to opaque 500 responses.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something unexpected went wrong, maybe create a GitHub issue?",
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
