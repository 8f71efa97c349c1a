use std::cmp::Ordering;

use uuid::Uuid;

use crate::domain::{CycleRecord, Identifiable};

/// Append-only history of finalized cycles.
///
/// Records are kept sorted by date, most recent first. Records sharing a date
/// are ordered by id, highest first, so the order depends only on content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    records: Vec<CycleRecord>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an archive from records in any order.
    pub fn from_records(records: Vec<CycleRecord>) -> Self {
        let mut archive = Self { records };
        archive.sort();
        archive
    }

    pub(crate) fn append(&mut self, record: CycleRecord) {
        self.records.push(record);
        self.sort();
    }

    /// Sorted, read-only view of every record.
    pub fn list(&self) -> &[CycleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&CycleRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Record with the most recent date.
    pub fn latest(&self) -> Option<&CycleRecord> {
        self.records.first()
    }

    fn sort(&mut self) {
        self.records.sort_by(archive_order);
    }
}

fn archive_order(a: &CycleRecord, b: &CycleRecord) -> Ordering {
    b.date().cmp(&a.date()).then_with(|| b.id().cmp(&a.id()))
}
