//! Snapshot memory access
//!
//! This module provides read-only access to a captured memory image:
//! - Raw image loading and bounds-checked physical reads
//! - Virtual-to-physical translation through captured page tables
//! - Typed structure reads and guarded kernel list walks

pub mod image;
pub mod reader;
pub mod translation;

pub use image::{PhysicalAddressSpace, SnapshotImage};
pub use reader::{ListWalker, SnapshotReader};
pub use translation::{AddressSpace, Amd64AddressSpace};
