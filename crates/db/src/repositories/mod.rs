use thiserror::Error;

use tripweaver_core::StoreError;

pub mod memory;
pub mod suggestion;
pub mod trip;

pub use memory::{InMemorySuggestionStore, InMemoryTripStore};
pub use suggestion::SqlSuggestionStore;
pub use trip::SqlTripStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Unique-key violations become [`StoreError::Conflict`] so callers can
/// recover by re-reading; everything else means the store is unusable.
impl From<RepositoryError> for StoreError {
    fn from(error: RepositoryError) -> Self {
        match &error {
            RepositoryError::Database(db_error)
                if db_error
                    .as_database_error()
                    .is_some_and(|inner| inner.is_unique_violation()) =>
            {
                StoreError::Conflict
            }
            _ => StoreError::Unavailable(error.to_string()),
        }
    }
}
