//! The filter engine: derives filtered views of the record list and the
//! choice sets used to populate the filter controls.
//!
//! Every function here is a pure derivation. The record list passed in is
//! never modified.

use std::collections::HashSet;

use serde::Serialize;
use time::Date;

use crate::record::FinancialRecord;

/// The predicates used to narrow down the record list.
///
/// Each predicate is optional. A predicate that is `None` or an empty string
/// places no constraint on the records, and all supplied predicates must hold
/// for a record to match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Only keep records with exactly this category.
    pub category: Option<String>,
    /// Only keep records with exactly this payment method.
    pub payment_method: Option<String>,
    /// Only keep records whose month, in long form (e.g. "January"), matches.
    pub month: Option<String>,
    /// Only keep records whose four-digit year (e.g. "2024") matches.
    pub year: Option<String>,
}

impl RecordFilter {
    /// Create a filter that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Constrain the payment method.
    pub fn payment_method(mut self, payment_method: &str) -> Self {
        self.payment_method = Some(payment_method.to_owned());
        self
    }

    /// Constrain the month by its long name, e.g. "March".
    pub fn month(mut self, month: &str) -> Self {
        self.month = Some(month.to_owned());
        self
    }

    /// Constrain the year, e.g. "2024".
    pub fn year(mut self, year: &str) -> Self {
        self.year = Some(year.to_owned());
        self
    }

    /// Whether the filter places no constraint at all.
    pub fn is_unconstrained(&self) -> bool {
        let predicates = self.predicates();

        predicates
            .into_iter()
            .all(|(predicate, _)| active(predicate).is_none())
    }

    /// Whether `record` satisfies every active predicate.
    pub fn matches(&self, record: &FinancialRecord) -> bool {
        let predicates = self.predicates();

        predicates
            .into_iter()
            .all(|(predicate, field)| match active(predicate) {
                Some(wanted) => field.value_of(record) == wanted,
                None => true,
            })
    }

    fn predicates(&self) -> [(&Option<String>, FilterField); 4] {
        [
            (&self.category, FilterField::Category),
            (&self.payment_method, FilterField::PaymentMethod),
            (&self.month, FilterField::Month),
            (&self.year, FilterField::Year),
        ]
    }
}

fn active(predicate: &Option<String>) -> Option<&str> {
    predicate.as_deref().filter(|value| !value.is_empty())
}

/// The record attributes that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    /// The record's category.
    Category,
    /// The record's payment method.
    PaymentMethod,
    /// The long month name derived from the record's date.
    Month,
    /// The four-digit year derived from the record's date.
    Year,
}

impl FilterField {
    /// The value of this field for `record`, as compared by [RecordFilter].
    pub fn value_of(self, record: &FinancialRecord) -> String {
        match self {
            FilterField::Category => record.category.clone(),
            FilterField::PaymentMethod => record.payment_method.clone(),
            FilterField::Month => month_name(record.date),
            FilterField::Year => year_label(record.date),
        }
    }
}

/// The long English month name of `date`, e.g. "January".
pub fn month_name(date: Date) -> String {
    date.month().to_string()
}

/// The year of `date` as four digits, e.g. "2024".
pub fn year_label(date: Date) -> String {
    format!("{:04}", date.year())
}

/// Get the records that satisfy `filter`, in their original order.
///
/// An empty result is not an error: it means no record matched.
pub fn filter_records(records: &[FinancialRecord], filter: &RecordFilter) -> Vec<FinancialRecord> {
    if filter.is_unconstrained() {
        return records.to_vec();
    }

    let filtered: Vec<FinancialRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();

    tracing::debug!(
        "Filter kept {} of {} records: {filter:?}",
        filtered.len(),
        records.len()
    );

    filtered
}

/// Get the unique values of `field` across `records`.
///
/// Values are returned in the order they are first seen.
pub fn distinct_values(records: &[FinancialRecord], field: FilterField) -> Vec<String> {
    let mut seen = HashSet::new();

    records
        .iter()
        .map(|record| field.value_of(record))
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// The choices for each filter control, derived from the full record list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// The distinct categories.
    pub categories: Vec<String>,
    /// The distinct payment methods.
    pub payment_methods: Vec<String>,
    /// The distinct long month names.
    pub months: Vec<String>,
    /// The distinct four-digit years.
    pub years: Vec<String>,
}

impl FilterOptions {
    /// Derive the filter choices from `records`.
    pub fn from_records(records: &[FinancialRecord]) -> Self {
        Self {
            categories: distinct_values(records, FilterField::Category),
            payment_methods: distinct_values(records, FilterField::PaymentMethod),
            months: distinct_values(records, FilterField::Month),
            years: distinct_values(records, FilterField::Year),
        }
    }
}
