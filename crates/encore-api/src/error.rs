use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use encore_types::api::ErrorResponse;

/// Core errors carried through handlers with `?`. Each kind gets its own
/// status code instead of collapsing everything to 500.
pub struct ApiError(encore_core::Error);

impl From<encore_core::Error> for ApiError {
    fn from(err: encore_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use encore_core::Error;

        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Authorization(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Storage(e) => {
                error!("storage failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

pub(crate) fn join_error(e: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", e);
    ApiError(encore_core::Error::Storage(anyhow::anyhow!(
        "task join error: {e}"
    )))
}
