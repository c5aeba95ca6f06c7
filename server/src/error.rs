//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use oc_rates_fx::{ConversionError, FxError};
use serde::Serialize;
use thiserror::Error;

/// Error body returned by every endpoint: `500 {"error": "<message>"}`.
///
/// Error kinds are not distinguished on the wire.
#[derive(Debug, Error, Serialize)]
#[error("{error}")]
pub struct ApiError {
    error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

impl From<FxError> for ApiError {
    fn from(err: FxError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_rates_common::Currency;

    #[test]
    fn test_every_error_is_500() {
        let response = ApiError::from(FxError::ProviderFetch).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let unknown = ConversionError::from(FxError::UnknownCurrency(Currency::new("XYZ")));
        let response = ApiError::from(unknown).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_from_error() {
        assert_eq!(
            ApiError::from(FxError::UpstreamRejected("bad key".into())).message(),
            "Error fetching rates : bad key"
        );
        assert_eq!(
            serde_json::to_value(ApiError::new("boom")).unwrap(),
            serde_json::json!({"error": "boom"})
        );
    }
}
