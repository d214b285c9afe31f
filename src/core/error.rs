//! Error types for Blockroot

use crate::core::types::ItemNumber;
use thiserror::Error;

/// Main error type for accumulator and proof operations
#[derive(Error, Debug)]
pub enum MerkleError {
    /// Caller-level misuse, e.g. asking for a proof from an item that is not
    /// earlier than its anchor
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The item lies outside the known committed history
    #[error("Item {number} is out of range: {reason}")]
    OutOfRange { number: ItemNumber, reason: String },

    /// An invariant assumed by the proof algorithm failed. Signals corrupt or
    /// mismatched snapshots and is never downgraded to a partial result.
    #[error("Internal consistency violation: {reason}")]
    InternalConsistency { reason: String },

    /// Malformed serialized data
    #[error("Invalid format for {format}: {reason}")]
    InvalidFormat { format: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Generic error for unexpected conditions
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MerkleError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn out_of_range(number: ItemNumber, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            number,
            reason: reason.into(),
        }
    }

    /// Create a new internal consistency error, logging it at warn level
    pub fn internal_consistency(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "merkle internal consistency violation");
        Self::InternalConsistency { reason }
    }

    pub fn invalid_format(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format: format.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    pub fn is_internal_consistency(&self) -> bool {
        matches!(self, Self::InternalConsistency { .. })
    }
}

/// Result type alias for Blockroot operations
pub type Result<T> = std::result::Result<T, MerkleError>;
