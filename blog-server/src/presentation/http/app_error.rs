use crate::domain::error::DomainError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid JSON body: {0}")]
    Body(#[from] JsonRejection),

    #[error("invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("not found")]
    Path(#[from] PathRejection),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Vec<&'static str>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut missing = None;
        let (status, message) = match self {
            AppError::Domain(err) => match err {
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                DomainError::MissingFields(fields) => {
                    missing = Some(fields);
                    (StatusCode::BAD_REQUEST, "missing fields".to_string())
                }
                DomainError::NotFound(message) => (StatusCode::NOT_FOUND, message),
                DomainError::Forbidden => (StatusCode::FORBIDDEN, "not allowed".to_string()),
                DomainError::Unexpected(cause) => {
                    error!(%cause, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Body(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                debug!(error = %rejection, "request body over limit");
                (StatusCode::PAYLOAD_TOO_LARGE, "request body too large".to_string())
            }
            err @ (AppError::Body(_) | AppError::Query(_)) => {
                debug!(error = %err, "request rejected");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Path(rejection) => {
                debug!(error = %rejection, "path did not match");
                (StatusCode::NOT_FOUND, "not found".to_string())
            }
        };

        let body = ErrorBody {
            status: status.as_u16(),
            message,
            missing,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::AppError;
    use crate::domain::error::DomainError;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let json = serde_json::from_slice(&bytes).expect("body must be JSON");
        (status, json)
    }

    #[tokio::test]
    async fn forbidden_renders_fixed_body() {
        let (status, body) = render(DomainError::Forbidden.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, serde_json::json!({"status": 403, "message": "not allowed"}));
    }

    #[tokio::test]
    async fn missing_fields_lists_names() {
        let (status, body) =
            render(DomainError::MissingFields(vec!["title", "content"]).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "missing fields");
        assert_eq!(body["missing"], serde_json::json!(["title", "content"]));
    }

    #[tokio::test]
    async fn unexpected_error_hides_cause() {
        let (status, body) =
            render(DomainError::Unexpected("connection reset".to_string()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "internal error");
    }
}
