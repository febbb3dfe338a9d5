//! Module records and address-range resolution

use crate::core::types::{Address, AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// A named, address-ranged kernel module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: String,
    pub base: Address,
    pub size: u64,
}

impl ModuleRecord {
    pub fn new(name: String, base: Address, size: u64) -> Self {
        ModuleRecord { name, base, size }
    }

    /// Gets the end address of the module
    pub fn end_address(&self) -> Address {
        self.base.offset(self.size)
    }

    /// Checks if an address is within this module
    pub fn contains_address(&self, address: Address) -> bool {
        address >= self.base && address < self.end_address()
    }
}

/// Resolves an address to the module owning it
pub trait ModuleResolver {
    fn find_module(&self, address: Address) -> Option<&ModuleRecord>;
}

/// A catalog of resolved kernel modules
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    modules: Vec<ModuleRecord>,
}

impl ModuleCatalog {
    pub fn new(modules: Vec<ModuleRecord>) -> Self {
        ModuleCatalog { modules }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.iter()
    }

    /// Like [`ModuleResolver::find_module`], but a miss is a typed error
    pub fn resolve(&self, address: Address) -> AnalysisResult<&ModuleRecord> {
        self.find_module(address)
            .ok_or_else(|| AnalysisError::ModuleUnresolved(format!("{address:#x}")))
    }
}

impl ModuleResolver for ModuleCatalog {
    fn find_module(&self, address: Address) -> Option<&ModuleRecord> {
        self.modules.iter().find(|m| m.contains_address(address))
    }
}
