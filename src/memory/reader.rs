//! Typed structure reads over an address space

use crate::core::types::{Address, AnalysisResult};
use crate::memory::translation::AddressSpace;
use std::collections::HashSet;
use tracing::debug;

/// Thin wrapper supplying typed reads over any [`AddressSpace`].
pub struct SnapshotReader<'a> {
    space: &'a dyn AddressSpace,
}

impl<'a> SnapshotReader<'a> {
    pub fn new(space: &'a dyn AddressSpace) -> Self {
        SnapshotReader { space }
    }

    /// Reads raw bytes
    pub fn read_bytes(&self, address: Address, len: usize) -> AnalysisResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.space.read_into(address, &mut buf)?;
        Ok(buf)
    }

    pub fn read_u16(&self, address: Address) -> AnalysisResult<u16> {
        let mut buf = [0u8; 2];
        self.space.read_into(address, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_u32(&self, address: Address) -> AnalysisResult<u32> {
        let mut buf = [0u8; 4];
        self.space.read_into(address, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_u64(&self, address: Address) -> AnalysisResult<u64> {
        let mut buf = [0u8; 8];
        self.space.read_into(address, &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Reads a 64-bit pointer field
    pub fn read_pointer(&self, address: Address) -> AnalysisResult<Address> {
        Ok(Address::new(self.read_u64(address)?))
    }

    /// Reads a fixed-size ASCII field, truncating at the first NUL
    pub fn read_ascii_fixed(&self, address: Address, len: usize) -> AnalysisResult<String> {
        let bytes = self.read_bytes(address, len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Reads `byte_len` bytes of UTF-16LE text
    pub fn read_utf16(&self, address: Address, byte_len: usize) -> AnalysisResult<String> {
        let bytes = self.read_bytes(address, byte_len & !1)?;
        let wide: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        let end = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
        Ok(String::from_utf16_lossy(&wide[..end]))
    }
}

/// Iterator over the entries of a kernel doubly-linked list.
///
/// Yields the address of each `LIST_ENTRY` link after the head sentinel;
/// callers subtract the link's embedded offset to reach the owning
/// structure. The walk stops at the head, on a read failure (snapshots are
/// routinely torn mid-update), on a revisited link, and at `max_entries`.
pub struct ListWalker<'a> {
    reader: SnapshotReader<'a>,
    head: Address,
    current: Address,
    seen: HashSet<u64>,
    remaining: usize,
}

impl<'a> ListWalker<'a> {
    pub fn new(space: &'a dyn AddressSpace, head: Address, max_entries: usize) -> Self {
        ListWalker {
            reader: SnapshotReader::new(space),
            head,
            current: head,
            seen: HashSet::new(),
            remaining: max_entries,
        }
    }
}

impl Iterator for ListWalker<'_> {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        if self.remaining == 0 {
            debug!(head = %self.head, "list walk hit entry cap");
            return None;
        }
        let next = match self.reader.read_pointer(self.current) {
            Ok(flink) => flink,
            Err(err) => {
                debug!(at = %self.current, %err, "list walk stopped on unreadable link");
                return None;
            }
        };
        if next == self.head || next.is_null() {
            return None;
        }
        if !self.seen.insert(next.as_u64()) {
            debug!(at = %next, "list walk stopped on cycle");
            return None;
        }
        self.remaining -= 1;
        self.current = next;
        Some(next)
    }
}
