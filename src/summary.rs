//! Single-figure summaries of a record set.
//!
//! Callers decide which record set is in scope: pass the full list for the
//! overall total, or the output of [crate::filter::filter_records] for the
//! total of the current view.

use serde::Serialize;

use crate::record::FinancialRecord;

/// The plain algebraic sum of the amounts in `records`.
pub fn total_signed(records: &[FinancialRecord]) -> f64 {
    records.iter().map(|record| record.amount).sum()
}

/// Income, expense and net totals of a record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// How many records were summarised.
    pub count: usize,
    /// The sum of all positive amounts.
    pub income: f64,
    /// The sum of the magnitudes of all zero or negative amounts.
    pub expense: f64,
    /// The signed sum of all amounts, equal to `income - expense`.
    pub net: f64,
}

impl Summary {
    /// Summarise `records` using the same income/expense split as the monthly
    /// aggregation.
    pub fn from_records(records: &[FinancialRecord]) -> Self {
        let (income, expense) =
            records
                .iter()
                .fold((0.0, 0.0), |(income, expense), record| {
                    if record.is_income() {
                        (income + record.amount, expense)
                    } else {
                        (income, expense + record.amount.abs())
                    }
                });

        Self {
            count: records.len(),
            income,
            expense,
            net: total_signed(records),
        }
    }
}
