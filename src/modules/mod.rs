//! Kernel module catalog and address resolution
//!
//! Images recorded in a session space carry only a load address; this
//! module owns the named, address-ranged records used to label them.

mod catalog;
mod source;

pub use catalog::{ModuleCatalog, ModuleRecord, ModuleResolver};
pub use source::KernelModuleSource;
