//! Session discovery over the process stream
//!
//! A session space is a single kernel object, but it is only reachable
//! through the translation context of a process logged into it. The locator
//! scans the process stream in order and anchors each distinct session to
//! the first process whose context can actually read it; processes whose
//! memory cannot be translated are passed over without giving up on their
//! session, which tolerates the torn and partially-unmapped records
//! expected in forensic captures.

use crate::core::types::{AnalysisError, SessionId};
use crate::process::ProcessSource;
use crate::session::space::{SessionSpace, SessionSpaceFactory};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, trace};

/// Lookup miss for [`SessionSpaceLocator::find`], carrying the requested
/// identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot locate a session {session_id}")]
pub struct SessionNotFound {
    pub session_id: SessionId,
}

impl From<SessionNotFound> for AnalysisError {
    fn from(err: SessionNotFound) -> Self {
        AnalysisError::SessionNotFound(err.session_id)
    }
}

/// Discovers the distinct session spaces referenced by a process stream.
pub struct SessionSpaceLocator<'a, F> {
    source: &'a dyn ProcessSource,
    factory: F,
}

impl<'a, F: SessionSpaceFactory> SessionSpaceLocator<'a, F> {
    pub fn new(source: &'a dyn ProcessSource, factory: F) -> Self {
        SessionSpaceLocator { source, factory }
    }

    /// Enumerates unique session spaces in process-stream order.
    ///
    /// Each call performs a fresh pass over the source with its own
    /// deduplication state; abandoning the iterator early has no side
    /// effects.
    pub fn enumerate(&self) -> SessionSpaces<'_, F> {
        SessionSpaces {
            records: self.source.processes(),
            factory: &self.factory,
            seen: HashSet::new(),
        }
    }

    /// Finds the session space with the given identifier.
    ///
    /// Scans `enumerate()` in order and returns the first match, or a
    /// typed [`SessionNotFound`] value when no discoverable session
    /// carries the identifier.
    pub fn find(&self, session_id: SessionId) -> Result<SessionSpace, SessionNotFound> {
        self.enumerate()
            .find(|session| session.session_id() == session_id)
            .ok_or(SessionNotFound { session_id })
    }
}

/// Iterator yielding one [`SessionSpace`] per distinct session identifier
pub struct SessionSpaces<'a, F> {
    records: Box<dyn Iterator<Item = crate::process::ProcessRecord> + 'a>,
    factory: &'a F,
    seen: HashSet<SessionId>,
}

impl<F: SessionSpaceFactory> Iterator for SessionSpaces<'_, F> {
    type Item = SessionSpace;

    fn next(&mut self) -> Option<SessionSpace> {
        for record in self.records.by_ref() {
            // Unaffiliated processes are not a session group of their own.
            let Some(session_id) = record.effective_session_id() else {
                continue;
            };
            if self.seen.contains(&session_id) {
                continue;
            }
            // No usable mapping: leave the identifier unseen so a later
            // process in the same session can still anchor it.
            let Some(space) = record.address_space() else {
                trace!(
                    process = record.id,
                    session = session_id,
                    "process memory not translatable, looking for another anchor"
                );
                continue;
            };
            match self.factory.make_session_space(record.session_object, space) {
                Ok(session) => {
                    self.seen.insert(session_id);
                    debug!(
                        session = session_id,
                        offset = %session.offset(),
                        anchor = record.id,
                        "anchored session space"
                    );
                    return Some(session);
                }
                Err(err) => {
                    // Same tolerance as an untranslatable process: the
                    // header pages may simply be absent from this capture
                    // of this process's mapping.
                    debug!(
                        process = record.id,
                        session = session_id,
                        %err,
                        "session header unreadable through this process"
                    );
                    continue;
                }
            }
        }
        None
    }
}
