use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use http::StatusCode;
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("not authorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(DieselError),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl BlogError {
    pub fn missing_fields() -> Self {
        BlogError::Validation("Missing required fields".into())
    }

    pub fn slug_taken(entity: &str) -> Self {
        BlogError::Conflict(format!("A {} with this slug already exists", entity))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            BlogError::Validation(_) | BlogError::Conflict(_) => StatusCode::BAD_REQUEST,
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::Unauthorized => StatusCode::UNAUTHORIZED,
            BlogError::Database(_) | BlogError::Pool(_) | BlogError::Io(_) | BlogError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DieselError> for BlogError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => BlogError::NotFound("record"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                BlogError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                BlogError::Validation("Referenced record does not exist".into())
            }
            e => BlogError::Database(e),
        }
    }
}

impl From<JsonRejection> for BlogError {
    fn from(rejection: JsonRejection) -> Self {
        BlogError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for BlogError {
    fn from(rejection: PathRejection) -> Self {
        BlogError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for BlogError {
    fn from(rejection: QueryRejection) -> Self {
        BlogError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for BlogError {
    fn from(e: MultipartError) -> Self {
        BlogError::Validation(format!("Invalid upload: {}", e.body_text()))
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{:?}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
