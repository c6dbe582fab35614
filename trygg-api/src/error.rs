use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use trygg_core::{OfferError, StoreError};

/// Translates engine error kinds into transport statuses. The engine only
/// signals which kind occurred and the offending id; the wording comes from
/// the error's own Display impl.
#[derive(Debug)]
pub struct ApiError(OfferError);

impl From<OfferError> for ApiError {
    fn from(err: OfferError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self.0 {
            OfferError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            OfferError::Expired(_) | OfferError::AlreadyAccepted(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            OfferError::Store(StoreError::VersionConflict(_)) => {
                (StatusCode::CONFLICT, self.0.to_string())
            }
            OfferError::Store(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
