use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// A failed user action: `message` is what the operator sees,
    /// `source` keeps the status code and the log detail.
    #[error("{message}: {source}")]
    Operation {
        message: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Attach the user-facing message for the action that failed
    pub fn with_message(self, message: impl Into<String>) -> Self {
        AppError::Operation {
            message: message.into(),
            source: Box::new(self),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Operation { source, .. } => source.status_code(),
        }
    }

    /// Message that is safe to send to the client.
    ///
    /// Store and internal failures are replaced by a generic text; their
    /// detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(sqlx::Error::RowNotFound) => "Data tidak ditemukan".to_string(),
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::Storage(_) => "Storage service unavailable".to_string(),
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Operation { message, .. } => message.clone(),
        }
    }

    /// Innermost error, skipping any `Operation` wrappers
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn log(&self) {
        match self.root() {
            AppError::Database(sqlx::Error::RowNotFound) => {}
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::Storage(msg) => tracing::error!("Storage error: {}", msg),
            _ => {}
        }
    }

    fn errors(&self) -> Option<Vec<String>> {
        match self {
            AppError::Validation(msg) => Some(vec![msg.clone()]),
            AppError::Operation { source, .. } => Some(vec![source.public_message()]),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = Json(ApiResponse::<()>::error(
            Some(self.public_message()),
            self.errors(),
        ));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_keeps_source_status() {
        let err = AppError::NotFound("Permohonan 7 tidak ditemukan".to_string())
            .with_message("Gagal mengubah status");

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Gagal mengubah status");
        assert_eq!(
            err.errors(),
            Some(vec!["Permohonan 7 tidak ditemukan".to_string()])
        );
    }

    #[test]
    fn test_database_detail_is_hidden() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut)
            .with_message("Gagal memuat data permohonan");

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.errors(),
            Some(vec!["Database error occurred".to_string()])
        );
        assert!(matches!(err.root(), AppError::Database(_)));
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = AppError::PayloadTooLarge("Ukuran file maksimal 10 MB".to_string());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.public_message(), "Ukuran file maksimal 10 MB");
    }
}
