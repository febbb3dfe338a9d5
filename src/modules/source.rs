//! Kernel loaded-module list enumeration

use crate::core::types::Address;
use crate::memory::{AddressSpace, ListWalker, SnapshotReader};
use crate::modules::catalog::{ModuleCatalog, ModuleRecord};
use crate::profile::Profile;
use std::sync::Arc;
use tracing::{debug, info};

/// Walks the kernel's loaded-module list into a [`ModuleCatalog`].
pub struct KernelModuleSource {
    space: Arc<dyn AddressSpace>,
    profile: Profile,
    list_head: Address,
    max_entries: usize,
}

impl KernelModuleSource {
    pub fn new(
        space: Arc<dyn AddressSpace>,
        profile: Profile,
        list_head: Address,
        max_entries: usize,
    ) -> Self {
        KernelModuleSource {
            space,
            profile,
            list_head,
            max_entries,
        }
    }

    /// Decodes the loader entry whose load-order link sits at `link`
    fn decode(&self, link: Address) -> Option<ModuleRecord> {
        let layout = self.profile.loader_entry;
        let strings = self.profile.unicode_string;
        let base = Address::new(link.as_u64().wrapping_sub(layout.load_links));
        let reader = SnapshotReader::new(self.space.as_ref());

        let dll_base = reader.read_pointer(base.offset(layout.dll_base)).ok()?;
        let size = reader.read_u32(base.offset(layout.size_of_image)).ok()?;

        // Counted UTF-16 name: length field first, buffer pointer after it
        let name_field = base.offset(layout.base_name);
        let length = reader.read_u16(name_field.offset(strings.length)).ok()?;
        let buffer = reader.read_pointer(name_field.offset(strings.buffer)).ok()?;
        if buffer.is_null() {
            debug!(entry = %base, "loader entry has no name buffer");
            return None;
        }
        let name = reader
            .read_utf16(buffer, (length as usize).min(strings.max_read))
            .ok()?;

        Some(ModuleRecord::new(name, dll_base, size as u64))
    }

    /// Realizes the catalog with one ordered pass over the list
    pub fn collect(&self) -> ModuleCatalog {
        let walker = ListWalker::new(self.space.as_ref(), self.list_head, self.max_entries);
        let modules: Vec<ModuleRecord> = walker.filter_map(|link| self.decode(link)).collect();
        info!(count = modules.len(), "catalogued kernel modules");
        ModuleCatalog::new(modules)
    }
}
