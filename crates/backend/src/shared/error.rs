use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::responses::ErrorResponse;
use contracts::shared::validation::ValidationErrors;
use sea_orm::DbErr;

/// Ошибки прикладного слоя
///
/// Every service operation returns this; the HTTP mapping lives in
/// [`IntoResponse`] below.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Uniqueness violation on a named field (email, dni)
    #[error("{message}")]
    Conflict { field: String, message: String },

    #[error("version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: i32, actual: i32 },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn conflict(field: &str, message: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// A version-guarded write matched no row: either someone else wrote
    /// first, or the row is gone.
    pub fn stale_write(element: &str, expected: i32, actual: Option<i32>) -> Self {
        match actual {
            Some(actual) => Self::VersionConflict { expected, actual },
            None => Self::NotFound(element.to_string()),
        }
    }

    /// Compare the client's version with the stored one
    pub fn check_version(expected: Option<i32>, actual: i32) -> ServiceResult<()> {
        match expected {
            Some(expected) if expected != actual => {
                Err(Self::VersionConflict { expected, actual })
            }
            _ => Ok(()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } | Self::VersionConflict { .. } => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Db(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Validation(errors) => ErrorResponse {
                fields: errors.fields,
                ..ErrorResponse::new("validation_failed")
            },
            Self::Conflict { field, message } => ErrorResponse::new("conflict")
                .with_message(message)
                .with_field(field),
            e @ Self::VersionConflict { .. } => {
                ErrorResponse::new("version_conflict").with_message(e.to_string())
            }
            Self::InvalidCredentials => ErrorResponse::new("invalid_credentials"),
            e @ Self::NotFound(_) => ErrorResponse::new("not_found").with_message(e.to_string()),
            Self::Forbidden => ErrorResponse::new("forbidden"),
            e @ (Self::Db(_) | Self::Internal(_)) => {
                tracing::error!("Request failed: {}", e);
                ErrorResponse::new("internal_error")
            }
        };
        (status, Json(body)).into_response()
    }
}
