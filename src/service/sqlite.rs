//! Implements a SQLite backed record service.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    record::{FinancialRecord, NewRecord, RecordId, UserId},
    service::RecordService,
};

const RECORD_COLUMNS: &str = "id, user_id, title, amount, category, payment_method, date";

/// Stores records in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteRecordService {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRecordService {
    /// Create a new service for the SQLite `connection`.
    ///
    /// This function will modify the database by adding the record table if it
    /// does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the table cannot be created or the lock on the
    /// connection is poisoned.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Result<Self, Error> {
        let service = Self { connection };
        create_record_table(&*service.connection()?)?;

        Ok(service)
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the file cannot be opened or initialized.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let connection = Connection::open(path)?;

        Self::new(Arc::new(Mutex::new(connection)))
    }

    /// Create a service backed by a fresh in-memory database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        let connection = Connection::open_in_memory()?;

        Self::new(Arc::new(Mutex::new(connection)))
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl RecordService for SqliteRecordService {
    async fn list(&self, user: &UserId) -> Result<Vec<FinancialRecord>, Error> {
        let connection = self.connection()?;

        let mut statement = connection.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM financial_record WHERE user_id = ?1 ORDER BY id ASC"
        ))?;

        let records = statement
            .query_map([user.as_str()], map_record_row)?
            .collect::<Result<Vec<FinancialRecord>, rusqlite::Error>>()?;

        Ok(records)
    }

    async fn create(&self, user: &UserId, record: NewRecord) -> Result<FinancialRecord, Error> {
        let connection = self.connection()?;

        let record = connection
            .prepare(&format!(
                "INSERT INTO financial_record \
                    (user_id, title, amount, category, payment_method, date) \
                VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
                RETURNING {RECORD_COLUMNS}"
            ))?
            .query_row(
                (
                    user.as_str(),
                    &record.title,
                    record.amount,
                    &record.category,
                    &record.payment_method,
                    record.date,
                ),
                map_record_row,
            )?;

        Ok(record)
    }

    async fn update(
        &self,
        user: &UserId,
        id: RecordId,
        record: &FinancialRecord,
    ) -> Result<FinancialRecord, Error> {
        let connection = self.connection()?;

        let record = connection
            .prepare(&format!(
                "UPDATE financial_record \
                SET \
                    title = ?1, \
                    amount = ?2, \
                    category = ?3, \
                    payment_method = ?4, \
                    date = ?5 \
                WHERE id = ?6 AND user_id = ?7 \
                RETURNING {RECORD_COLUMNS}"
            ))?
            .query_row(
                (
                    &record.title,
                    record.amount,
                    &record.category,
                    &record.payment_method,
                    record.date,
                    id,
                    user.as_str(),
                ),
                map_record_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingRecord(id),
                error => error.into(),
            })?;

        Ok(record)
    }

    async fn delete(&self, user: &UserId, id: RecordId) -> Result<(), Error> {
        let connection = self.connection()?;

        let rows_affected = connection.execute(
            "DELETE FROM financial_record WHERE id = ?1 AND user_id = ?2",
            (id, user.as_str()),
        )?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingRecord(id));
        }

        Ok(())
    }
}

/// Create the record table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS financial_record (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                payment_method TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_financial_record_user_date \
        ON financial_record(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [FinancialRecord].
fn map_record_row(row: &Row) -> Result<FinancialRecord, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new_unchecked(row.get(1)?);
    let title = row.get(2)?;
    let amount = row.get(3)?;
    let category = row.get(4)?;
    let payment_method = row.get(5)?;
    let date = row.get(6)?;

    Ok(FinancialRecord {
        id,
        user_id,
        title,
        amount,
        category,
        payment_method,
        date,
    })
}
