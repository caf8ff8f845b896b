use actix_web::{HttpResponse, error::ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// One entry of the 400 validation error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation Error")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Pool(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();
        let body = match self {
            AppError::Validation(errors) => ErrorBody {
                message: "Validation Error",
                errors: Some(errors),
                error: None,
            },
            AppError::Token(_) => ErrorBody {
                message: "Invalid token",
                errors: None,
                error: None,
            },
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => ErrorBody {
                message: "Server Error",
                errors: None,
                error: Some(message.clone()),
            },
            _ => ErrorBody {
                message: &message,
                errors: None,
                error: None,
            },
        };
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = AppError::Validation(vec![FieldError {
            field: "title",
            message: "Title is required",
        }]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn forbidden_keeps_its_message() {
        let err = AppError::Forbidden("You are not authorized to update this post".into());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            err.to_string(),
            "You are not authorized to update this post"
        );
    }

    #[test]
    fn rate_limit_maps_to_429() {
        let err = AppError::RateLimitExceeded;
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn database_errors_are_500() {
        let err = AppError::Internal("boom".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
