use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::nutrition::EstimatorError;

/// Failure taxonomy for the `/logFood` surface. Validation is always
/// client-caused; everything else maps to a fixed 500 message while the full
/// detail stays in the server log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Estimation(#[from] EstimatorError),
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl ApiError {
    pub fn missing_body_field(field: &str) -> Self {
        Self::Validation(format!("Missing `{field}` in request body."))
    }

    pub fn missing_param(name: &str) -> Self {
        Self::Validation(format!("Missing `{name}` parameter."))
    }

    pub fn save_failed(source: sqlx::Error) -> Self {
        Self::Store {
            message: "Failed to save entry to database.",
            source,
        }
    }

    pub fn fetch_failed(source: sqlx::Error) -> Self {
        Self::Store {
            message: "Failed to fetch entries.",
            source,
        }
    }

    pub fn delete_failed(source: sqlx::Error) -> Self {
        Self::Store {
            message: "Failed to delete entry.",
            source,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Estimation(_) | Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Estimation(EstimatorError::Malformed(_)) => {
                "Failed to parse nutrition data from AI response.".into()
            }
            Self::Estimation(_) => "Failed to process request.".into(),
            Self::Store { message, .. } => (*message).into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_verbatim_message() {
        let response = ApiError::missing_param("userId").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing `userId` parameter." })
        );
    }

    #[tokio::test]
    async fn missing_body_field_names_the_field() {
        let response = ApiError::missing_body_field("food").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing `food` in request body." })
        );
    }

    #[tokio::test]
    async fn malformed_estimation_maps_to_parse_message() {
        let response =
            ApiError::from(EstimatorError::Malformed("no fields".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to parse nutrition data from AI response." })
        );
    }

    #[tokio::test]
    async fn store_failure_hides_internal_detail() {
        let response = ApiError::save_failed(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to save entry to database." })
        );
    }
}
