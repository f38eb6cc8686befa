//! # Error Types
//!
//! This module defines the error type used throughout the crate, along with
//! the severity classification the batch runner uses to decide whether to
//! skip an instruction or abort the whole batch.

use thiserror::Error;

/// How far a failure propagates inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The instruction is recorded as rejected and the batch continues.
    Recoverable,
    /// The remaining instructions are abandoned.
    Fatal,
}

/// Main error type for printer operations
#[derive(Debug, Error)]
pub enum PrinterError {
    /// Transport could not establish a link to the printer
    #[error("Could not connect to printer: {0}")]
    Connection(String),

    /// Instruction name is not in the dispatch table
    #[error("Method not found: {0}")]
    UnknownMethod(String),

    /// Wrong parameter count or type, or an unrecognized token
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invoked before a connection was established
    #[error("Printer is not connected")]
    NotConnected,

    /// Transport-level errors after connecting (write, flush)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed JSON payload at the batch boundary
    #[error("Invalid payload: {0}")]
    Payload(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrinterError {
    /// Shorthand for an [`PrinterError::InvalidArgument`] with a formatted message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Classify this error for batch control flow.
    ///
    /// Only malformed instructions are recoverable. Anything that touches the
    /// session or the link ends the batch.
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownMethod(_) | Self::InvalidArgument(_) => Severity::Recoverable,
            Self::Connection(_)
            | Self::NotConnected
            | Self::Transport(_)
            | Self::Payload(_)
            | Self::Io(_) => Severity::Fatal,
        }
    }
}
