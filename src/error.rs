//! # Error Types
//!
//! Custom error types for the uplink decoder using `thiserror`.

use thiserror::Error;

/// Main error type for the uplink decoder
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecoderError {
    /// Frame shorter than the 11-byte fixed status header
    #[error("Payload too short for binary format: {actual} bytes, need at least {required}")]
    TooShort { actual: usize, required: usize },

    /// Defensive catch-all for any other fault during field extraction
    #[error("Internal decode failure: {0}")]
    Internal(String),
}

/// Result type alias for the uplink decoder
pub type Result<T> = std::result::Result<T, DecoderError>;
