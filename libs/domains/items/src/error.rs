use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::posting::PostingError;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item {0} not found")]
    NotFound(Uuid),

    #[error("Item {0} is not available")]
    NotAvailable(Uuid),

    #[error("Invalid new owner {0}")]
    InvalidOwner(Uuid),

    /// The item stays swapped; only the notification failed
    #[error(transparent)]
    Posting(#[from] PostingError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

impl From<DbErr> for ItemError {
    fn from(err: DbErr) -> Self {
        ItemError::Database(err.to_string())
    }
}

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(_) => AppError::NotFound(err.to_string()),
            ItemError::NotAvailable(_) => AppError::NotAvailable(err.to_string()),
            ItemError::InvalidOwner(_) => AppError::BadRequest(err.to_string()),
            ItemError::Posting(e) => {
                AppError::BadGateway(format!("Item swapped but order posting failed: {}", e))
            }
            ItemError::Database(msg) => AppError::InternalServerError(format!("Database error: {}", msg)),
            ItemError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
