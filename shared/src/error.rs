use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy shared across all layers.
///
/// Business-rule violations carry the message that is shown to the client;
/// storage failures keep the source error for the operator log and are
/// surfaced to the client as a generic 500.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ResourceConflict(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("transaction error")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation error")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ValidationError(report) => {
                let errors: Vec<String> =
                    report.iter().map(|(_, error)| error.to_string()).collect();
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::UnprocessableEntity(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::EntityNotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            AppError::ResourceConflict(message) => {
                (StatusCode::CONFLICT, Json(json!({ "error": message }))).into_response()
            }
            error @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)) => {
                tracing::error!(
                    error.cause_chain = ?error,
                    error.message = %error,
                    "Unexpected error happened"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
