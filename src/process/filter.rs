//! Generic process selection filters

use crate::core::types::{Address, ProcessId};
use crate::process::{ProcessRecord, ProcessSource};

/// Selects processes by identifier or by object offset.
///
/// An empty filter selects everything.
#[derive(Debug, Clone, Default)]
pub struct ProcessFilter {
    pids: Vec<ProcessId>,
    offsets: Vec<Address>,
}

impl ProcessFilter {
    pub fn new(pids: Vec<ProcessId>, offsets: Vec<Address>) -> Self {
        ProcessFilter { pids, offsets }
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty() && self.offsets.is_empty()
    }

    pub fn matches(&self, record: &ProcessRecord) -> bool {
        if self.is_empty() {
            return true;
        }
        self.pids.contains(&record.id) || self.offsets.contains(&record.offset)
    }
}

/// A process source narrowed by a [`ProcessFilter`]
pub struct FilteredSource<'a, S: ProcessSource + ?Sized> {
    inner: &'a S,
    filter: ProcessFilter,
}

impl<'a, S: ProcessSource + ?Sized> FilteredSource<'a, S> {
    pub fn new(inner: &'a S, filter: ProcessFilter) -> Self {
        FilteredSource { inner, filter }
    }
}

impl<S: ProcessSource + ?Sized> ProcessSource for FilteredSource<'_, S> {
    fn processes(&self) -> Box<dyn Iterator<Item = ProcessRecord> + '_> {
        Box::new(
            self.inner
                .processes()
                .filter(|record| self.filter.matches(record)),
        )
    }
}
