//! Process enumeration from the snapshot's active-process list

use crate::core::types::{Address, WinTimestamp};
use crate::memory::{AddressSpace, Amd64AddressSpace, ListWalker, SnapshotImage, SnapshotReader};
use crate::process::ProcessRecord;
use crate::profile::Profile;
use std::sync::Arc;
use tracing::{debug, trace};

/// Supplier of an ordered process stream.
///
/// Every call to `processes` starts an independent traversal; sources are
/// side-effect-free and may be enumerated any number of times.
pub trait ProcessSource {
    fn processes(&self) -> Box<dyn Iterator<Item = ProcessRecord> + '_>;
}

impl ProcessSource for [ProcessRecord] {
    fn processes(&self) -> Box<dyn Iterator<Item = ProcessRecord> + '_> {
        Box::new(self.iter().cloned())
    }
}

impl ProcessSource for Vec<ProcessRecord> {
    fn processes(&self) -> Box<dyn Iterator<Item = ProcessRecord> + '_> {
        self.as_slice().processes()
    }
}

/// Process enumerator walking the kernel's active-process list.
///
/// Entries that cannot be decoded are skipped, not fatal: a snapshot may
/// have been captured mid-update or with pages missing.
pub struct KernelProcessSource {
    image: Arc<SnapshotImage>,
    kernel_space: Arc<dyn AddressSpace>,
    profile: Profile,
    list_head: Address,
    max_entries: usize,
}

impl KernelProcessSource {
    pub fn new(
        image: Arc<SnapshotImage>,
        kernel_space: Arc<dyn AddressSpace>,
        profile: Profile,
        list_head: Address,
        max_entries: usize,
    ) -> Self {
        KernelProcessSource {
            image,
            kernel_space,
            profile,
            list_head,
            max_entries,
        }
    }

    /// Decodes the process object whose active-links entry sits at `link`
    fn decode(&self, link: Address) -> Option<ProcessRecord> {
        let layout = &self.profile.process;
        let base = Address::new(link.as_u64().wrapping_sub(layout.active_links));
        let reader = SnapshotReader::new(self.kernel_space.as_ref());

        let id = match reader.read_u64(base.offset(layout.unique_process_id)) {
            Ok(id) => id,
            Err(err) => {
                debug!(process = %base, %err, "skipping undecodable process entry");
                return None;
            }
        };
        let name = reader
            .read_ascii_fixed(base.offset(layout.image_file_name), layout.image_file_name_len)
            .unwrap_or_default();
        let create_time = reader
            .read_u64(base.offset(layout.create_time))
            .map(WinTimestamp::new)
            .unwrap_or(WinTimestamp::new(0));
        let session_object = reader
            .read_pointer(base.offset(layout.session))
            .unwrap_or(Address::null());

        // The identifier lives in the session object, not the process;
        // an unreadable session leaves the record unaffiliated.
        let session_id = if session_object.is_null() {
            None
        } else {
            reader
                .read_u32(session_object.offset(self.profile.session_space.session_id))
                .ok()
        };

        let address_space = reader
            .read_u64(base.offset(layout.directory_table_base))
            .ok()
            .and_then(|dtb| {
                Amd64AddressSpace::new(self.image.clone(), Address::new(dtb))
                    .map(|space| Arc::new(space) as Arc<dyn AddressSpace>)
                    .map_err(|err| {
                        trace!(process = %base, %err, "process has no usable mapping");
                        err
                    })
                    .ok()
            });

        Some(ProcessRecord::with_details(
            id,
            name,
            create_time,
            base,
            session_id,
            session_object,
            address_space,
        ))
    }
}

impl ProcessSource for KernelProcessSource {
    fn processes(&self) -> Box<dyn Iterator<Item = ProcessRecord> + '_> {
        let walker = ListWalker::new(self.kernel_space.as_ref(), self.list_head, self.max_entries);
        Box::new(walker.filter_map(move |link| self.decode(link)))
    }
}
