//! Custom error types for sessionscan

use thiserror::Error;

use super::SessionId;

/// Main error type for snapshot analysis operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid snapshot address: {0}")]
    InvalidAddress(String),

    #[error("Address {address} is not translatable: {reason}")]
    TranslationUnavailable { address: String, reason: String },

    #[error("Read beyond snapshot bounds at {address} ({requested} bytes, {available} available)")]
    OutOfBounds {
        address: String,
        requested: usize,
        available: u64,
    },

    #[error("Session {0} not found among discovered sessions")]
    SessionNotFound(SessionId),

    #[error("Module not resolved for address {0}")]
    ModuleUnresolved(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Malformed structure at {address}: {reason}")]
    MalformedStructure { address: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    /// Creates a translation-unavailable error for an address
    pub fn untranslatable(address: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        AnalysisError::TranslationUnavailable {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an out-of-bounds read error
    pub fn out_of_bounds(address: impl std::fmt::Display, requested: usize, available: u64) -> Self {
        AnalysisError::OutOfBounds {
            address: address.to_string(),
            requested,
            available,
        }
    }

    /// Creates a malformed-structure error
    pub fn malformed(address: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        AnalysisError::MalformedStructure {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
