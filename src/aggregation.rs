//! Record aggregation for the income vs. expense chart.
//!
//! Buckets records by calendar month and year and sums income and expenses
//! per bucket, producing a series that a chart renderer can consume as is.

use std::collections::HashMap;

use serde::Serialize;
use time::{Date, Month};

use crate::record::FinancialRecord;

/// The income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The bucket label, e.g. "Jan 2024".
    #[serde(rename = "month")]
    pub month_label: String,
    /// The sum of all positive amounts in the month.
    pub income: f64,
    /// The sum of the magnitudes of all zero or negative amounts in the month.
    pub expense: f64,
}

impl MonthlyTotals {
    fn new(month_label: String) -> Self {
        Self {
            month_label,
            income: 0.0,
            expense: 0.0,
        }
    }

    fn add(&mut self, record: &FinancialRecord) {
        if record.is_income() {
            self.income += record.amount;
        } else {
            self.expense += record.amount.abs();
        }
    }
}

/// Aggregates record amounts into monthly income and expense totals.
///
/// Records are sorted by date first (ties keep their original order) and
/// buckets are emitted in the order they are first seen, so the series is
/// chronological. The input slice is left untouched.
///
/// # Returns
/// One [MonthlyTotals] per calendar month that has at least one record, or an
/// empty vector if there are no records.
pub fn aggregate_by_month(records: &[FinancialRecord]) -> Vec<MonthlyTotals> {
    let mut sorted: Vec<&FinancialRecord> = records.iter().collect();
    // `sort_by_key` is stable.
    sorted.sort_by_key(|record| record.date);

    let mut series: Vec<MonthlyTotals> = Vec::new();
    let mut bucket_positions: HashMap<String, usize> = HashMap::new();

    for record in sorted {
        let label = format_month_label(record.date);

        let position = match bucket_positions.get(&label) {
            Some(&position) => position,
            None => {
                series.push(MonthlyTotals::new(label.clone()));
                bucket_positions.insert(label, series.len() - 1);
                series.len() - 1
            }
        };

        series[position].add(record);
    }

    tracing::debug!(
        "Aggregated {} records into {} monthly buckets",
        records.len(),
        series.len()
    );

    series
}

/// Formats the bucket label of `date`, e.g. "Jan 2024".
pub fn format_month_label(date: Date) -> String {
    format!("{} {:04}", short_month_name(date.month()), date.year())
}

/// The three-letter abbreviation of `month`, e.g. "Jan".
pub fn short_month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
