//! Implements a record service that keeps records in process memory.

use std::sync::{Mutex, MutexGuard};

use crate::{
    Error,
    record::{FinancialRecord, NewRecord, RecordId, UserId},
    service::RecordService,
};

/// Stores records in memory for the lifetime of the process.
///
/// Useful for tests and for trying out the CLI without a database file.
#[derive(Debug)]
pub struct MemoryRecordService {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    next_id: RecordId,
    records: Vec<FinancialRecord>,
}

impl Default for MemoryRecordService {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl MemoryRecordService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service that already holds `records`, possibly for several
    /// users.
    ///
    /// New records are assigned IDs after the largest existing ID.
    pub fn with_records(records: Vec<FinancialRecord>) -> Self {
        let next_id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;

        Self {
            state: Mutex::new(MemoryState { next_id, records }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, Error> {
        self.state.lock().map_err(|error| {
            tracing::error!("Could not acquire the record lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl RecordService for MemoryRecordService {
    async fn list(&self, user: &UserId) -> Result<Vec<FinancialRecord>, Error> {
        let state = self.lock()?;

        Ok(state
            .records
            .iter()
            .filter(|record| &record.user_id == user)
            .cloned()
            .collect())
    }

    async fn create(&self, user: &UserId, record: NewRecord) -> Result<FinancialRecord, Error> {
        let mut state = self.lock()?;

        let record = record.finalize(state.next_id, user.clone());
        state.next_id += 1;
        state.records.push(record.clone());

        Ok(record)
    }

    async fn update(
        &self,
        user: &UserId,
        id: RecordId,
        record: &FinancialRecord,
    ) -> Result<FinancialRecord, Error> {
        let mut state = self.lock()?;

        let stored = state
            .records
            .iter_mut()
            .find(|stored| stored.id == id && &stored.user_id == user)
            .ok_or(Error::UpdateMissingRecord(id))?;

        *stored = FinancialRecord {
            id,
            user_id: user.clone(),
            ..record.clone()
        };

        Ok(stored.clone())
    }

    async fn delete(&self, user: &UserId, id: RecordId) -> Result<(), Error> {
        let mut state = self.lock()?;

        let position = state
            .records
            .iter()
            .position(|record| record.id == id && &record.user_id == user)
            .ok_or(Error::DeleteMissingRecord(id))?;

        state.records.remove(position);

        Ok(())
    }
}
