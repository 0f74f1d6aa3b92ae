//! Defines the crate level error type.

use crate::{grid::ColumnId, record::RecordId};

/// The errors that may occur while managing financial records.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A mutation or sync was attempted without a signed in user.
    ///
    /// Callers should treat the record set as empty until a session starts.
    #[error("no user is signed in")]
    NotAuthenticated,

    /// Tried to update a record that does not exist for the signed in user.
    #[error("tried to update record {0}, which does not exist")]
    UpdateMissingRecord(RecordId),

    /// Tried to delete a record that does not exist for the signed in user.
    ///
    /// Deleting the same record twice results in this error on the second
    /// attempt, the record list is left unchanged.
    #[error("tried to delete record {0}, which does not exist")]
    DeleteMissingRecord(RecordId),

    /// The ID used to address an update does not match the ID of the record
    /// carried by the update.
    ///
    /// Editing never changes a record's identity.
    #[error("update for record {path} carried record {record}")]
    RecordIdMismatch {
        /// The ID the update was addressed to.
        path: RecordId,
        /// The ID of the record in the update.
        record: RecordId,
    },

    /// The record belongs to a different user than the one signed in.
    #[error("record {0} belongs to another user")]
    ForeignRecord(RecordId),

    /// The text entered for an amount is not a finite number.
    ///
    /// The update is blocked, nothing is sent to the backing service.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The text entered for a date is not a calendar date in the form
    /// `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// An empty string was used as a user ID.
    #[error("user ID cannot be empty")]
    EmptyUserId,

    /// Tried to edit a column that is display-only.
    #[error("the {0} column cannot be edited")]
    NotEditable(ColumnId),

    /// The configuration could not be used as given.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The tracing subscriber could not be installed.
    #[error("could not set up logging: {0}")]
    LoggingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The backing service failed for a reason not covered above.
    ///
    /// These failures are recoverable, the caller may retry the operation.
    #[error("the record service failed: {0}")]
    Service(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}
