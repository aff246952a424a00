//! Error type for backend functions.

use thiserror::Error;

use crate::blob::BlobError;
use crate::model::PeriodError;
use crate::save::SaveError;
use crate::store::StoreError;

/// Error returned by a function handler. The service turns it into a
/// failed envelope with [`HandlerError::status_code`] as HTTP status.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No function registered under this name.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    /// The input could not be decoded into the function's input type.
    #[error("Invalid request body: {0}")]
    DecodeFailed(String),
    /// The guard found required fields missing.
    #[error("Missing required fields for {0}")]
    GuardRejected(String),
    /// Input decoded but is not acceptable (e.g. a month of 13).
    #[error("{0}")]
    Invalid(String),
    /// The addressed record or object does not exist.
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl From<PeriodError> for HandlerError {
    fn from(err: PeriodError) -> Self {
        HandlerError::Invalid(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownFunction(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Invalid(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::Store(_) => 500,
            HandlerError::Save(SaveError::Validation(_)) => 400,
            HandlerError::Save(_) => 500,
            HandlerError::Blob(BlobError::NotFound { .. }) => 404,
            HandlerError::Blob(BlobError::InvalidPath(_)) => 400,
            HandlerError::Blob(_) => 500,
            HandlerError::Other(_) => 500,
        }
    }
}
