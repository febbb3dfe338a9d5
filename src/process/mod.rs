//! Process records and enumeration
//!
//! This module supplies the ordered process stream the session locator
//! consumes: the record type, the source trait with its kernel-list
//! implementation, and the generic selection filter inherited by the
//! command surface.

mod filter;
mod record;
mod source;

pub use filter::{FilteredSource, ProcessFilter};
pub use record::ProcessRecord;
pub use source::{KernelProcessSource, ProcessSource};
