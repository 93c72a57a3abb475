use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Shown in place of any storage failure; details stay in the logs.
pub const GENERIC_FAILURE: &str = "Ha ocurrido un error inesperado. Inténtelo de nuevo más tarde.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("request failed: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": GENERIC_FAILURE })),
        )
            .into_response()
    }
}

/// Storage constraint violations that map back onto a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreViolation {
    Unique,
    ForeignKey,
}

impl StoreViolation {
    pub fn classify(err: &DbErr) -> Option<Self> {
        match err.sql_err()? {
            SqlErr::UniqueConstraintViolation(_) => Some(Self::Unique),
            SqlErr::ForeignKeyConstraintViolation(_) => Some(Self::ForeignKey),
            _ => None,
        }
    }
}
