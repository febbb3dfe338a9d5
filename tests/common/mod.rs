//! Shared synthetic-snapshot builder for integration tests

#![allow(dead_code)]

use sessionscan::core::{Address, SessionId};
use sessionscan::memory::{AddressSpace, PhysicalAddressSpace, SnapshotImage};
use sessionscan::profile::Profile;
use std::sync::Arc;

/// Builds a raw snapshot image by writing structures at chosen offsets.
pub struct SnapshotBuilder {
    data: Vec<u8>,
    profile: Profile,
}

impl SnapshotBuilder {
    pub fn new(size: usize, profile: Profile) -> Self {
        SnapshotBuilder {
            data: vec![0u8; size],
            profile,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn write_u16(&mut self, offset: u64, value: u16) -> &mut Self {
        let offset = offset as usize;
        self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u32(&mut self, offset: u64, value: u32) -> &mut Self {
        let offset = offset as usize;
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u64(&mut self, offset: u64, value: u64) -> &mut Self {
        let offset = offset as usize;
        self.data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_ascii(&mut self, offset: u64, text: &str) -> &mut Self {
        let offset = offset as usize;
        self.data[offset..offset + text.len()].copy_from_slice(text.as_bytes());
        self
    }

    pub fn write_utf16(&mut self, offset: u64, text: &str) -> u16 {
        let mut len = 0u16;
        for (i, c) in text.encode_utf16().enumerate() {
            let at = offset as usize + i * 2;
            self.data[at..at + 2].copy_from_slice(&c.to_le_bytes());
            len += 2;
        }
        len
    }

    /// Chains `head -> links[0] -> ... -> head` through forward pointers
    pub fn link_list(&mut self, head: u64, links: &[u64]) -> &mut Self {
        let mut previous = head;
        for &link in links {
            self.write_u64(previous, link);
            previous = link;
        }
        self.write_u64(previous, head);
        self
    }

    /// Identity-maps the low 2 MiB through one large page, with the
    /// table root at 0x1000
    pub fn identity_map_low_2m(&mut self) -> Address {
        const PRESENT: u64 = 1;
        const HUGE: u64 = 1 << 7;
        self.write_u64(0x1000, 0x2000 | PRESENT);
        self.write_u64(0x2000, 0x3000 | PRESENT);
        self.write_u64(0x3000, PRESENT | HUGE);
        Address::new(0x1000)
    }

    /// Writes a session-space header at `at`
    pub fn place_session(
        &mut self,
        at: u64,
        session_id: SessionId,
        pool_start: u64,
        pool_end: u64,
    ) -> &mut Self {
        let layout = self.profile.session_space;
        self.write_u32(at + layout.session_id, session_id);
        self.write_u64(at + layout.paged_pool_start, pool_start);
        self.write_u64(at + layout.paged_pool_end, pool_end);
        // empty process and image lists point back at their heads
        self.write_u64(at + layout.process_list, at + layout.process_list);
        self.write_u64(at + layout.image_list, at + layout.image_list);
        self
    }

    /// Writes a process object at `at`
    pub fn place_process(
        &mut self,
        at: u64,
        pid: u64,
        name: &str,
        create_time: u64,
        session_ptr: u64,
        dtb: u64,
    ) -> &mut Self {
        let layout = self.profile.process;
        self.write_u64(at + layout.unique_process_id, pid);
        self.write_ascii(at + layout.image_file_name, name);
        self.write_u64(at + layout.create_time, create_time);
        self.write_u64(at + layout.session, session_ptr);
        self.write_u64(at + layout.directory_table_base, dtb);
        self
    }

    /// Writes a session image entry at `at`
    pub fn place_image_entry(&mut self, at: u64, load_address: u64) -> &mut Self {
        let layout = self.profile.session_image;
        self.write_u64(at + layout.address, load_address);
        self
    }

    /// Writes a loader-table entry at `at`, with its name buffer at
    /// `name_buffer`
    pub fn place_loader_entry(
        &mut self,
        at: u64,
        name: &str,
        name_buffer: u64,
        dll_base: u64,
        size: u32,
    ) -> &mut Self {
        let layout = self.profile.loader_entry;
        let strings = self.profile.unicode_string;
        self.write_u64(at + layout.dll_base, dll_base);
        self.write_u32(at + layout.size_of_image, size);
        let length = self.write_utf16(name_buffer, name);
        self.write_u16(at + layout.base_name + strings.length, length);
        self.write_u64(at + layout.base_name + strings.buffer, name_buffer);
        self
    }

    pub fn build(&self) -> Arc<SnapshotImage> {
        Arc::new(SnapshotImage::from_bytes(self.data.clone()))
    }

    /// The built image viewed as an identity address space
    pub fn physical_space(&self) -> Arc<dyn AddressSpace> {
        Arc::new(PhysicalAddressSpace::new(self.build()))
    }
}
