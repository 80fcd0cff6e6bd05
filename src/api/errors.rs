use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::error::EngineError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    question_ids: Option<Vec<String>>,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Field-level rejection carrying the offending question ids.
    Validation {
        detail: String,
        question_ids: Vec<String>,
    },
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            EngineError::ActivityNotOpen => ApiError::Forbidden("Activity is not open to you"),
            EngineError::AttemptAlreadyInProgress
            | EngineError::AttemptLimitExceeded { .. }
            | EngineError::ActivityLocked
            | EngineError::InvalidAttemptState { .. } => ApiError::Conflict(err.to_string()),
            EngineError::MissingAnswers(ref question_ids) => ApiError::Validation {
                detail: err.to_string(),
                question_ids: question_ids.clone(),
            },
            EngineError::InvalidAnswer { ref question_id, .. } => ApiError::Validation {
                detail: err.to_string(),
                question_ids: vec![question_id.clone()],
            },
            EngineError::UnknownQuestion { .. } | EngineError::GradeOutOfRange { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            EngineError::CorruptQuestion(_) => {
                ApiError::internal(err, "Inconsistent question definition")
            }
            EngineError::Db(err) => ApiError::internal(err, "Database error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let status = StatusCode::UNAUTHORIZED;
                let mut response = (
                    status,
                    Json(ErrorResponse {
                        status: status.as_u16(),
                        detail: message.to_string(),
                        question_ids: None,
                    }),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => {
                let status = StatusCode::FORBIDDEN;
                (
                    status,
                    Json(ErrorResponse {
                        status: status.as_u16(),
                        detail: message.to_string(),
                        question_ids: None,
                    }),
                )
                    .into_response()
            }
            ApiError::BadRequest(message) => {
                let status = StatusCode::BAD_REQUEST;
                (
                    status,
                    Json(ErrorResponse {
                        status: status.as_u16(),
                        detail: message,
                        question_ids: None,
                    }),
                )
                    .into_response()
            }
            ApiError::NotFound(message) => {
                let status = StatusCode::NOT_FOUND;
                (
                    status,
                    Json(ErrorResponse {
                        status: status.as_u16(),
                        detail: message,
                        question_ids: None,
                    }),
                )
                    .into_response()
            }
            ApiError::Conflict(message) => {
                let status = StatusCode::CONFLICT;
                (
                    status,
                    Json(ErrorResponse {
                        status: status.as_u16(),
                        detail: message,
                        question_ids: None,
                    }),
                )
                    .into_response()
            }
            ApiError::Validation { detail, question_ids } => {
                let status = StatusCode::BAD_REQUEST;
                (
                    status,
                    Json(ErrorResponse {
                        status: status.as_u16(),
                        detail,
                        question_ids: Some(question_ids),
                    }),
                )
                    .into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (
                    status,
                    Json(ErrorResponse {
                        status: status.as_u16(),
                        detail: message,
                        question_ids: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}
