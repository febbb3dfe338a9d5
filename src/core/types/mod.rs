//! Core type definitions for sessionscan
//!
//! This module contains the fundamental types used throughout the analyzer,
//! including the snapshot address wrapper, timestamp conversion, and error
//! types.

mod address;
mod error;
mod timestamp;

// Re-export all public types
pub use address::Address;
pub use error::{AnalysisError, AnalysisResult};
pub use timestamp::WinTimestamp;

// Common type aliases
pub type ProcessId = u64;
pub type SessionId = u32;
