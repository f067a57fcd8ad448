//! Errors raised by the service shell.
//!
//! The balance and settlement computations never fail; everything here comes
//! from validating new records or talking to the database.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("Inconsistent data: {0}")]
    Integrity(String),
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidExpense(_) | AppError::InvalidUser(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Integrity(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Integrity(_) | AppError::Database(_) => {
                tracing::error!("request failed: {self}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}
