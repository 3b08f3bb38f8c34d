//! Errors returned by the notification feed entry points.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] anyhow::Error),
}
