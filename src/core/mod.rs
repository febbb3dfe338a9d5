//! Core module containing fundamental types for sessionscan
//!
//! This module provides the foundational building blocks used throughout
//! the analyzer: snapshot address handling, timestamp conversion, and
//! error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Address, AnalysisError, AnalysisResult, ProcessId, SessionId, WinTimestamp};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
