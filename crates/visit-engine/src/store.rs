//! Persistence collaborator boundary.
//!
//! The engine never talks to storage itself. The Series Mutator writes
//! through [`RecordStore`] and returns; callers re-fetch the record set
//! before the next resolution. The engine surface is synchronous — if the
//! real backing service is asynchronous, bridging is the collaborator's
//! concern. No retries happen here: a failed call may still have partially
//! succeeded remotely, so only a re-fetch reveals the actual stored state.

use thiserror::Error;

use crate::record::ScheduleRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no record with id '{0}'")]
    NotFound(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Create/update/delete surface the backing store must provide.
pub trait RecordStore {
    fn create(&mut self, record: ScheduleRecord) -> Result<(), StoreError>;
    fn update(&mut self, record: ScheduleRecord) -> Result<(), StoreError>;
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ScheduleRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScheduleRecord>) -> Self {
        Self { records }
    }

    /// Current contents — the caller's "re-fetch" after a mutation.
    pub fn records(&self) -> &[ScheduleRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ScheduleRecord> {
        self.records
    }
}

impl RecordStore for MemoryStore {
    fn create(&mut self, record: ScheduleRecord) -> Result<(), StoreError> {
        // Ids are caller-assigned; a second create for the same id is a
        // backend misuse, not an upsert.
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Backend(format!(
                "duplicate record id '{}'",
                record.id
            )));
        }
        self.records.push(record);
        Ok(())
    }

    fn update(&mut self, record: ScheduleRecord) -> Result<(), StoreError> {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound(record.id)),
        }
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
