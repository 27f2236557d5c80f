use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use genai_core::GenAiError;
use serde::Serialize;
use thiserror::Error;

/// API Error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Generation(#[from] GenAiError),
}

/// Error response structure
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Generation(e) => match e {
                GenAiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                GenAiError::Configuration => StatusCode::SERVICE_UNAVAILABLE,
                GenAiError::SynthesisRefused(_) => StatusCode::UNPROCESSABLE_ENTITY,
                GenAiError::NoAudioProduced
                | GenAiError::AllVariationsFailed
                | GenAiError::Transport(_)
                | GenAiError::Decode(_) => StatusCode::BAD_GATEWAY,
                GenAiError::Audio(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            ApiError::InvalidInput(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Generation(e) => e.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", status, error_message);
        } else {
            tracing::warn!("{}: {}", status, error_message);
        }

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(GenAiError::Configuration).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(GenAiError::SynthesisRefused("no".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(GenAiError::AllVariationsFailed).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(GenAiError::InvalidInput("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
