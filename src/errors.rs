use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::errors::{DomainError, ErrorKind};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        AppError::Domain(DomainError::InvalidRequest(msg.into()))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidRequest | ErrorKind::InvalidStatus => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ProductUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::InsufficientStock
        | ErrorKind::InvalidTransition
        | ErrorKind::ConstraintViolation => StatusCode::CONFLICT,
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => status_for(e.kind()),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Domain(e @ DomainError::StoreUnavailable(detail)) => {
                log::error!("Store unavailable: {}", detail);
                json!({ "error": e.kind(), "message": "Database temporarily unavailable" })
            }
            AppError::Domain(e @ DomainError::ConstraintViolation(detail)) => {
                log::error!("Constraint violation: {}", detail);
                json!({ "error": e.kind(), "message": "Request conflicts with stored data" })
            }
            AppError::Domain(e) => {
                let mut body = json!({ "error": e.kind(), "message": e.to_string() });
                match e {
                    DomainError::ProductUnavailable { product_id } => {
                        body["product_id"] = json!(product_id);
                    }
                    DomainError::InsufficientStock {
                        product_id,
                        requested,
                        available,
                    } => {
                        body["product_id"] = json!(product_id);
                        body["requested"] = json!(requested);
                        body["available"] = json!(available);
                    }
                    DomainError::NotFound { id, .. } => {
                        body["id"] = json!(id);
                    }
                    DomainError::InvalidTransition { order_id, from, to } => {
                        body["order_id"] = json!(order_id);
                        body["from"] = json!(from.as_str());
                        body["to"] = json!(to.as_str());
                    }
                    _ => {}
                }
                body
            }
            AppError::Internal(detail) => {
                log::error!("Internal error: {}", detail);
                json!({ "error": "internal", "message": "Internal server error" })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Fatal errors raised while bringing the process up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not create database pool: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("could not run database migrations: {0}")]
    Migration(String),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
