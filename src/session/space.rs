//! Typed session-space views

use crate::core::types::{Address, AnalysisError, AnalysisResult, SessionId, WinTimestamp};
use crate::memory::{AddressSpace, ListWalker, SnapshotReader};
use crate::process::ProcessRecord;
use crate::profile::Profile;
use std::sync::Arc;

/// One image mapped into a session space.
///
/// Carries no name; names are resolved externally against the module
/// catalog when the report is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRecord {
    /// Address of the image entry within the session space
    pub offset: Address,
    /// Load address of the image itself
    pub address: Address,
}

/// A session space: the kernel region shared by all processes of one logon
/// session.
///
/// The view is anchored to the translation context of the first process
/// that could reach it; the region is aliased into every member process,
/// so any member's mapping reads the same bytes.
#[derive(Debug, Clone)]
pub struct SessionSpace {
    offset: Address,
    session_id: SessionId,
    paged_pool_start: Address,
    paged_pool_end: Address,
    space: Arc<dyn AddressSpace>,
    profile: Profile,
    max_list_entries: usize,
}

impl SessionSpace {
    /// Base offset of the session object within the snapshot
    pub fn offset(&self) -> Address {
        self.offset
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn paged_pool_start(&self) -> Address {
        self.paged_pool_start
    }

    pub fn paged_pool_end(&self) -> Address {
        self.paged_pool_end
    }

    /// Processes belonging to this session, in session-list order.
    ///
    /// Walked lazily through the anchored context; entries that cannot be
    /// decoded are dropped.
    pub fn processes(&self) -> impl Iterator<Item = ProcessRecord> + '_ {
        let layout = self.profile.process;
        let head = self.offset.offset(self.profile.session_space.process_list);
        ListWalker::new(self.space.as_ref(), head, self.max_list_entries).filter_map(
            move |link| {
                let base = Address::new(link.as_u64().wrapping_sub(layout.session_links));
                let reader = SnapshotReader::new(self.space.as_ref());
                let id = reader.read_u64(base.offset(layout.unique_process_id)).ok()?;
                let name = reader
                    .read_ascii_fixed(
                        base.offset(layout.image_file_name),
                        layout.image_file_name_len,
                    )
                    .unwrap_or_default();
                let create_time = reader
                    .read_u64(base.offset(layout.create_time))
                    .map(WinTimestamp::new)
                    .unwrap_or(WinTimestamp::new(0));
                Some(ProcessRecord::with_details(
                    id,
                    name,
                    create_time,
                    base,
                    Some(self.session_id),
                    self.offset,
                    None,
                ))
            },
        )
    }

    /// Images mapped into this session, in image-list order
    pub fn images(&self) -> impl Iterator<Item = ImageRecord> + '_ {
        let layout = self.profile.session_image;
        let head = self.offset.offset(self.profile.session_space.image_list);
        ListWalker::new(self.space.as_ref(), head, self.max_list_entries).filter_map(
            move |link| {
                let base = Address::new(link.as_u64().wrapping_sub(layout.link));
                let reader = SnapshotReader::new(self.space.as_ref());
                let address = reader.read_pointer(base.offset(layout.address)).ok()?;
                Some(ImageRecord {
                    offset: base,
                    address,
                })
            },
        )
    }
}

/// Constructor of typed session-space views.
///
/// Given a session object's offset and a translation context able to reach
/// it, produces the typed view with its header fields realized.
pub trait SessionSpaceFactory {
    fn make_session_space(
        &self,
        offset: Address,
        space: Arc<dyn AddressSpace>,
    ) -> AnalysisResult<SessionSpace>;
}

/// Factory reading session headers through a structure profile
#[derive(Debug, Clone)]
pub struct ProfileSessionFactory {
    profile: Profile,
    max_list_entries: usize,
}

impl ProfileSessionFactory {
    pub fn new(profile: Profile, max_list_entries: usize) -> Self {
        ProfileSessionFactory {
            profile,
            max_list_entries,
        }
    }
}

impl SessionSpaceFactory for ProfileSessionFactory {
    fn make_session_space(
        &self,
        offset: Address,
        space: Arc<dyn AddressSpace>,
    ) -> AnalysisResult<SessionSpace> {
        if offset.is_null() {
            return Err(AnalysisError::malformed(offset, "null session pointer"));
        }
        let layout = self.profile.session_space;
        let reader = SnapshotReader::new(space.as_ref());
        let session_id = reader.read_u32(offset.offset(layout.session_id))?;
        let paged_pool_start = reader.read_pointer(offset.offset(layout.paged_pool_start))?;
        let paged_pool_end = reader.read_pointer(offset.offset(layout.paged_pool_end))?;
        Ok(SessionSpace {
            offset,
            session_id,
            paged_pool_start,
            paged_pool_end,
            space,
            profile: self.profile,
            max_list_entries: self.max_list_entries,
        })
    }
}
