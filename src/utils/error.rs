use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::utils::responses::{ApiResponse, ServerCode};

/// Application error taxonomy. Each variant maps onto one envelope code;
/// storage failures roll back their transaction before surfacing here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    /// Auth failure that must answer 403 (banned account, unverified email).
    #[error("{0}")]
    Forbidden(String),
    /// Domain-rule violation: overlap, duplicate, missing resource.
    #[error("{0}")]
    InvalidArgs(String),
    #[error("{0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn from_validation(errors: ValidationErrors) -> Self {
        AppError::Validation(first_validation_message(&errors))
    }

    fn server_code(&self) -> ServerCode {
        match self {
            AppError::Validation(_) => ServerCode::ValidationError,
            AppError::Auth(_) | AppError::Forbidden(_) => ServerCode::AuthError,
            AppError::InvalidArgs(_) => ServerCode::InvalidArgs,
            AppError::Internal(_) | AppError::Database(_) => ServerCode::UnknownError,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidArgs(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = self.server_code();
        let message = match self {
            AppError::Internal(cause) => {
                error!("internal error: {}", cause);
                format!("Unknown Error (Code: {})", code.as_u16())
            }
            AppError::Database(cause) => {
                error!("database error: {}", cause);
                format!("Unknown Error (Code: {})", code.as_u16())
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::failure(code, message))
    }
}

/// Reports the first failing rule's message; validation failures are
/// never aggregated into one response.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    for kind in errors.errors().values() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(e) = field_errors.first() {
                    return e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                return first_validation_message(nested);
            }
            ValidationErrorsKind::List(items) => {
                if let Some(nested) = items.values().next() {
                    return first_validation_message(nested);
                }
            }
        }
    }
    "Invalid request".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 0.0, message = "Price must be at least 0"))]
        price: f64,
    }

    #[test]
    fn first_message_is_reported() {
        let probe = Probe {
            name: String::new(),
            price: -1.0,
        };
        let msg = first_validation_message(&probe.validate().unwrap_err());
        assert!(msg == "Name is required" || msg == "Price must be at least 0");
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidArgs("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Auth("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_errors_hide_the_cause() {
        let resp = AppError::Internal("pool exhausted".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
