//! Process record type

use crate::core::types::{Address, ProcessId, SessionId, WinTimestamp};
use crate::memory::AddressSpace;
use std::sync::Arc;

/// One process observed in the snapshot.
///
/// Records are produced by a [`super::ProcessSource`] and are read-only to
/// every consumer. The attached address space, when present, reads memory
/// through this process's captured page tables.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub id: ProcessId,
    pub name: String,
    pub create_time: WinTimestamp,
    /// Virtual address of the process object itself
    pub offset: Address,
    /// Session identifier, when the owning session could be read
    pub session_id: Option<SessionId>,
    /// Pointer to the owning session-space object
    pub session_object: Address,
    address_space: Option<Arc<dyn AddressSpace>>,
}

impl ProcessRecord {
    /// Creates a record with minimal information
    pub fn new(id: ProcessId, name: String) -> Self {
        ProcessRecord {
            id,
            name,
            create_time: WinTimestamp::new(0),
            offset: Address::null(),
            session_id: None,
            session_object: Address::null(),
            address_space: None,
        }
    }

    /// Creates a fully populated record
    #[allow(clippy::too_many_arguments)]
    pub fn with_details(
        id: ProcessId,
        name: String,
        create_time: WinTimestamp,
        offset: Address,
        session_id: Option<SessionId>,
        session_object: Address,
        address_space: Option<Arc<dyn AddressSpace>>,
    ) -> Self {
        ProcessRecord {
            id,
            name,
            create_time,
            offset,
            session_id,
            session_object,
            address_space,
        }
    }

    /// The session identifier this record belongs to, for grouping purposes.
    ///
    /// A zero identifier marks a process outside any logon session (torn or
    /// early-boot records carry it too) and is treated the same as absent.
    pub fn effective_session_id(&self) -> Option<SessionId> {
        match self.session_id {
            Some(0) | None => None,
            Some(id) => Some(id),
        }
    }

    /// Translation context for this process's memory, if one could be built
    pub fn address_space(&self) -> Option<Arc<dyn AddressSpace>> {
        self.address_space.clone()
    }
}
