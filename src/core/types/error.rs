//! Error types for the automation executor

use super::game::TextSpeed;
use thiserror::Error;

/// Errors raised by the remote debug channel.
///
/// Channel failures are transient by taxonomy: the executor propagates them
/// without retrying, leaving retry policy to the orchestrating routine.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("I/O error on debug channel: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed channel response: {0}")]
    Protocol(String),

    #[error("short read at {address}: expected {expected} bytes, got {actual}")]
    ShortRead {
        address: String,
        expected: usize,
        actual: usize,
    },

    #[error("channel closed by peer")]
    Closed,
}

impl ChannelError {
    /// Creates a protocol error
    pub fn protocol(reason: impl Into<String>) -> Self {
        ChannelError::Protocol(reason.into())
    }

    /// Creates a short read error
    pub fn short_read(address: impl std::fmt::Display, expected: usize, actual: usize) -> Self {
        ChannelError::ShortRead {
            address: address.to_string(),
            expected,
            actual,
        }
    }
}

/// Main error type for executor operations
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("invalid memory address: {0}")]
    InvalidAddress(String),

    // Configuration-fatal errors: detected once at session start, not
    // retried. The operator has to fix the console before relaunching.
    #[error("running title {0} is not a supported Sword/Shield image; check the console")]
    WrongTitle(String),

    #[error("trainer data is not valid; fix or re-create the save before starting")]
    InvalidTrainerData,

    #[error("text speed is set to {0:?}; it must be Fast for correct operation")]
    TextSpeedTooSlow(TextSpeed),

    #[error("debug channel failure: {0}")]
    Channel(#[from] ChannelError),

    #[error("operation cancelled")]
    Cancelled,
}

/// Result type alias for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Result type alias for raw channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

impl ExecutorError {
    /// True when the error requires operator intervention rather than retry
    pub fn is_configuration_fatal(&self) -> bool {
        matches!(
            self,
            ExecutorError::WrongTitle(_)
                | ExecutorError::InvalidTrainerData
                | ExecutorError::TextSpeedTooSlow(_)
        )
    }
}
