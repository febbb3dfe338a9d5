//! Sessionscan library for logon-session extraction from memory snapshots

pub mod config;
pub mod core;
pub mod memory;
pub mod modules;
pub mod process;
pub mod profile;
pub mod report;
pub mod session;

// Re-export main types from core module
pub use crate::core::types::{
    Address, AnalysisError, AnalysisResult, ProcessId, SessionId, WinTimestamp,
};

// Re-export version information
pub use crate::core::{AUTHORS, VERSION};
