//! Raw snapshot image loading and physical reads

use crate::core::types::{Address, AnalysisError, AnalysisResult};
use crate::memory::translation::AddressSpace;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// A raw physical-memory snapshot, loaded read-only for the whole run.
pub struct SnapshotImage {
    path: PathBuf,
    data: Vec<u8>,
}

impl fmt::Debug for SnapshotImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotImage")
            .field("path", &self.path)
            .field("size", &self.data.len())
            .finish()
    }
}

impl SnapshotImage {
    /// Loads a snapshot image from disk
    pub fn open<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path)?;
        info!(
            image = %path.display(),
            size = data.len(),
            "loaded memory snapshot"
        );
        Ok(SnapshotImage { path, data })
    }

    /// Wraps an in-memory buffer as a snapshot image
    pub fn from_bytes(data: Vec<u8>) -> Self {
        SnapshotImage {
            path: PathBuf::from("<memory>"),
            data,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total size of the physical image in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Checks whether a physical address lies inside the image
    pub fn contains(&self, address: Address) -> bool {
        address.as_u64() < self.size()
    }

    /// Reads bytes at a physical offset into the caller's buffer
    pub fn read_at(&self, address: Address, buf: &mut [u8]) -> AnalysisResult<()> {
        let start = address.as_u64();
        let end = start
            .checked_add(buf.len() as u64)
            .ok_or_else(|| AnalysisError::InvalidAddress(format!("{address}")))?;
        if end > self.size() {
            return Err(AnalysisError::out_of_bounds(
                address,
                buf.len(),
                self.size().saturating_sub(start),
            ));
        }
        buf.copy_from_slice(&self.data[start as usize..end as usize]);
        Ok(())
    }
}

/// Identity view over the snapshot: virtual address == physical offset.
///
/// Used for reading page tables (which are addressed physically) and for
/// snapshots captured without translation.
#[derive(Debug, Clone)]
pub struct PhysicalAddressSpace {
    image: Arc<SnapshotImage>,
}

impl PhysicalAddressSpace {
    pub fn new(image: Arc<SnapshotImage>) -> Self {
        PhysicalAddressSpace { image }
    }

    pub fn image(&self) -> &Arc<SnapshotImage> {
        &self.image
    }
}

impl AddressSpace for PhysicalAddressSpace {
    fn read_into(&self, address: Address, buf: &mut [u8]) -> AnalysisResult<()> {
        self.image.read_at(address, buf)
    }
}
