use thiserror::Error;

use crate::store::StoreError;

/// Failures while starting or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Failed to prepare ledger store: {0}")]
    Store(#[from] StoreError),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
