//! Core domain errors.

use thiserror::Error;

/// Core domain errors for tfrun.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
