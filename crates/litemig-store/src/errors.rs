//! Error handling for litemig-store
//!
//! Wraps the litemig-core ExError with store-specific helpers

use litemig_core::errors::{ExError, ExErrorKind};

pub use litemig_core::errors::{from_rusqlite, Result};

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an invalid input error
pub fn invalid_input(operation: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(operation.to_string())
        .with_message(reason)
}
