use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::params::{ErrorDetail, ParamError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request parameters failed validation")]
    Validation(Vec<ParamError>),
    #[error(transparent)]
    Path(#[from] PathRejection),
    #[error(transparent)]
    Query(#[from] QueryRejection),
    #[error("Not Found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    detail: Vec<ErrorDetail>,
}

impl From<Vec<ParamError>> for AppError {
    fn from(errors: Vec<ParamError>) -> Self {
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::Validation(errors) => {
                tracing::debug!(?errors, "rejecting request parameters");
                let body = ValidationBody {
                    detail: errors.iter().map(ParamError::detail).collect(),
                };
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            // The router's own rejections already carry status and message.
            AppError::Path(rejection) => return rejection.into_response(),
            AppError::Query(rejection) => return rejection.into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "detail": "Not Found" })),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParamKind, ParamSource};
    use serde_json::Value;

    #[tokio::test]
    async fn test_validation_error_response() {
        let error = AppError::from(vec![ParamError::Invalid {
            location: ParamSource::Path,
            name: "item_id",
            kind: ParamKind::Integer,
            input: "abc".to_string(),
        }]);

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["detail"][0]["type"], "int_parsing");
        assert_eq!(body["detail"][0]["loc"], json!(["path", "item_id"]));
        assert_eq!(body["detail"][0]["input"], "abc");
    }

    #[tokio::test]
    async fn test_validation_detail_field_order() {
        let response = AppError::from(vec![ParamError::Missing {
            location: ParamSource::Query,
            name: "urgent",
        }])
        .into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            r#"{"detail":[{"type":"missing","loc":["query","urgent"],"msg":"Field required","input":null}]}"#
        );
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_hides_message() {
        let response = AppError::Internal("table mismatch".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
