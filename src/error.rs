use thiserror::Error;

use crate::models::SessionState;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("cannot move session from {from} to {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    #[error("media unavailable: {0}")]
    MediaUnavailable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
