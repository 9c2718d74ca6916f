pub mod config;

use std::collections::BTreeMap;

use actix_web::{
    error::{BlockingError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use diesel::result::DatabaseErrorKind;
use serde_json::json;
use thiserror::Error;

use crate::database::unique_violation;

/// Field name mapped to the ordered messages describing what is wrong with it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/** Used for sharing the persistence handle and hashing settings between requests */
pub struct AppState<D> {
    pub db: D,
    pub bcrypt_cost: u32,
}

impl<D: Clone> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

/** Holds the errors we will use during request processing */
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    UnauthorizedError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }

    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnauthorizedError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::InternalServerError(details) => {
                log::error!("request failed: {}", details);
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => AppError::NotFound("Resource not found".into()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                unique_violation(info.constraint_name())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                AppError::BadRequest("Database integrity error".into())
            }
            other => AppError::internal(other),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::internal(err)
    }
}

impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        AppError::internal(err)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::internal(err)
    }
}

/// Turns body deserialization failures into the same JSON error shape as every other failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::Deserialize(inner) => format!("Invalid JSON body: {}", inner),
        JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
        other => other.to_string(),
    };

    AppError::BadRequest(message).into()
}

/// Path segments that aren't valid ids can't name an existing resource.
pub fn path_error_handler(
    _err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::NotFound("Resource not found".into()).into()
}
