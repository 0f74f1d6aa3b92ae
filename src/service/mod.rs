//! Contains the trait for the backing service that persists records, and its
//! implementations.

mod memory;
mod sqlite;

pub use memory::MemoryRecordService;
pub use sqlite::{SqliteRecordService, create_record_table};

use std::future::Future;

use crate::{
    Error,
    record::{FinancialRecord, NewRecord, RecordId, UserId},
};

/// Persists records on behalf of the [RecordStore](crate::store::RecordStore).
///
/// Every operation is scoped to `user`: implementations must never return,
/// change or delete a record owned by anyone else.
pub trait RecordService {
    /// Get all of `user`'s records, in the order they were created.
    fn list(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<Vec<FinancialRecord>, Error>> + Send;

    /// Create a record owned by `user`, returning it with its assigned ID.
    fn create(
        &self,
        user: &UserId,
        record: NewRecord,
    ) -> impl Future<Output = Result<FinancialRecord, Error>> + Send;

    /// Replace the record `id` with `record`, returning the stored record.
    ///
    /// # Errors
    /// Implementers should return [Error::UpdateMissingRecord] if `user` has
    /// no record with the ID `id`.
    fn update(
        &self,
        user: &UserId,
        id: RecordId,
        record: &FinancialRecord,
    ) -> impl Future<Output = Result<FinancialRecord, Error>> + Send;

    /// Permanently delete the record `id`.
    ///
    /// # Errors
    /// Implementers should return [Error::DeleteMissingRecord] if `user` has
    /// no record with the ID `id`.
    fn delete(
        &self,
        user: &UserId,
        id: RecordId,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}
