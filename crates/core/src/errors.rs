use thiserror::Error;

use crate::domain::trip::TripId;

/// Failures at the storage ports. `Conflict` is reserved for unique-key
/// violations on insert-if-absent and is recovered by re-reading the
/// existing record; everything else is a genuine persistence problem.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors the suggestion pipeline surfaces to its caller. Upstream weather or
/// enrichment failures and malformed budget strings never appear here; they
/// degrade to fallbacks inside the pipeline.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SuggestError {
    #[error("trip `{0}` was not found")]
    TripNotFound(TripId),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl SuggestError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TripNotFound(_) => "The requested trip does not exist.",
            Self::Persistence(_) => "The service is temporarily unavailable. Please retry shortly.",
        }
    }
}
