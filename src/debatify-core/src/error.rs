//! Error types for the debate toolkit.

use crate::recorder::RecorderState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebatifyError {
    #[error("Model API transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model API returned HTTP status {status}")]
    ApiStatus { status: u16 },

    #[error("Subject text is empty; nothing to send to the model")]
    EmptySubject,

    #[error("Invalid recorder transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: RecorderState,
        to: RecorderState,
    },

    #[error("Session store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
