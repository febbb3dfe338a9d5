//! Per-session report aggregation
//!
//! Transforms discovered session spaces into structured records: header
//! fields, the realized process list, and the image list labeled through
//! the module resolver. A failed module lookup degrades one line, never
//! the session or the run.

pub mod render;

use crate::core::types::{Address, ProcessId, SessionId, WinTimestamp};
use crate::modules::ModuleResolver;
use crate::session::SessionSpace;
use serde::{Deserialize, Serialize};

/// Marker emitted when an image's owning module cannot be determined
pub const UNRESOLVED_MODULE: &str = "UNKNOWN";

/// One process line of a session report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub id: ProcessId,
    pub name: String,
    pub create_time: WinTimestamp,
    pub offset: Address,
}

/// One image line of a session report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub offset: Address,
    pub address: Address,
    pub module: String,
}

/// Correlated report for one logon session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub offset: Address,
    pub session_id: SessionId,
    pub process_count: usize,
    pub paged_pool_start: Address,
    pub paged_pool_end: Address,
    pub processes: Vec<ProcessEntry>,
    pub images: Vec<ImageEntry>,
}

/// Assembles session reports against a module resolver.
pub struct ReportBuilder<'a, R: ModuleResolver + ?Sized> {
    resolver: &'a R,
}

impl<'a, R: ModuleResolver + ?Sized> ReportBuilder<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        ReportBuilder { resolver }
    }

    /// Builds one report per session, in input order
    pub fn build(&self, sessions: impl IntoIterator<Item = SessionSpace>) -> Vec<SessionReport> {
        sessions
            .into_iter()
            .map(|session| self.build_session(&session))
            .collect()
    }

    /// Single-pass aggregation of one session
    pub fn build_session(&self, session: &SessionSpace) -> SessionReport {
        // The header carries a count, so the process list is realized
        // exactly once rather than probed for emptiness.
        let processes: Vec<ProcessEntry> = session
            .processes()
            .map(|record| ProcessEntry {
                id: record.id,
                name: record.name.clone(),
                create_time: record.create_time,
                offset: record.offset,
            })
            .collect();

        let images: Vec<ImageEntry> = session
            .images()
            .map(|image| ImageEntry {
                offset: image.offset,
                address: image.address,
                module: self
                    .resolver
                    .find_module(image.address)
                    .map(|module| module.name.clone())
                    .unwrap_or_else(|| UNRESOLVED_MODULE.to_string()),
            })
            .collect();

        SessionReport {
            offset: session.offset(),
            session_id: session.session_id(),
            process_count: processes.len(),
            paged_pool_start: session.paged_pool_start(),
            paged_pool_end: session.paged_pool_end(),
            processes,
            images,
        }
    }
}
