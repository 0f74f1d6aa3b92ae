//! Finrecords keeps track of a user's income and expenses.
//!
//! This library holds the record list for a signed in user and derives
//! everything shown about it: filtered views, monthly income and expense
//! totals for charting, summary figures and the cells of an editable grid.
//! Records are persisted through a [RecordService](service::RecordService).

#![warn(missing_docs)]

pub mod aggregation;
pub mod chart;
pub mod config;
mod error;
pub mod filter;
pub mod format;
pub mod grid;
pub mod logging;
pub mod record;
pub mod service;
pub mod store;
pub mod summary;

pub use error::Error;
pub use record::{FinancialRecord, NewRecord, RecordId, UserId};
pub use store::RecordStore;
