use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::StoreError;

pub type AppResult<T> = Result<T, AppError>;

/// Failures as seen by an HTTP client. Everything raised inside a handler ends up here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        missing_fields: Vec<&'static str>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn missing_fields(message: impl Into<String>, missing_fields: Vec<&'static str>) -> Self {
        Self::Validation {
            message: message.into(),
            missing_fields,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// A body or query string the extractor could not parse. The detail is logged,
    /// the client only sees `message`.
    pub fn rejected(message: &'static str, rejection: impl std::fmt::Display) -> Self {
        warn!(error = %rejection, "request rejected");
        Self::BadRequest(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(anyhow::Error::new(e))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "missingFields", skip_serializing_if = "Option::is_none")]
    missing_fields: Option<Vec<&'static str>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation {
                message,
                missing_fields,
            } => ErrorBody {
                message,
                missing_fields: Some(missing_fields),
            },
            AppError::Internal(e) => {
                error!(error = ?e, "request failed");
                ErrorBody {
                    message: "Server error".into(),
                    missing_fields: None,
                }
            }
            other => ErrorBody {
                message: other.to_string(),
                missing_fields: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
