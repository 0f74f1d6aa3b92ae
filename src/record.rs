//! Defines the financial record, the single entity managed by this crate, and
//! the parsing rules for the values a user types in for it.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::Error;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Alias for the integer type used for record IDs.
///
/// IDs are assigned by the backing service when a record is created and never
/// change afterwards.
pub type RecordId = i64;

/// A newtype wrapper for the opaque ID of the user that owns a record.
///
/// User IDs are issued by the authentication provider, the core never
/// interprets them beyond equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    ///
    /// # Errors
    /// Returns [Error::EmptyUserId] if `id` is empty or only whitespace.
    pub fn new(id: &str) -> Result<Self, Error> {
        let id = id.trim();

        if id.is_empty() {
            return Err(Error::EmptyUserId);
        }

        Ok(Self(id.to_owned()))
    }

    /// Create a user ID without validation.
    ///
    /// The caller should ensure the ID came from a trusted source, e.g. a row
    /// written by [UserId::new].
    pub fn new_unchecked(id: String) -> Self {
        Self(id)
    }

    /// The user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new record, use [FinancialRecord::build] and hand the result to
/// the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    /// The ID of the record.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// The user that owns the record.
    pub user_id: UserId,
    /// A free-text label, e.g. "Groceries".
    pub title: String,
    /// The amount of money earned (positive) or spent (zero or negative).
    pub amount: f64,
    /// The classification of the record, e.g. "Food", "Rent".
    pub category: String,
    /// How the money moved, e.g. "Cash", "Credit Card".
    pub payment_method: String,
    /// When the record happened.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl FinancialRecord {
    /// Create a new record.
    ///
    /// Shortcut for [NewRecord] for discoverability.
    pub fn build(title: &str, amount: f64, date: Date) -> NewRecord {
        NewRecord {
            title: title.to_owned(),
            amount,
            category: String::new(),
            payment_method: String::new(),
            date,
        }
    }

    /// Whether the record counts as income.
    ///
    /// Only strictly positive amounts are income, everything else (zero
    /// included) counts towards expenses.
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}

/// A record that has not been created yet, so it has no ID.
///
/// The owner is not part of the builder: the record store stamps the signed
/// in user onto the record when it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// A free-text label.
    pub title: String,
    /// The signed amount, positive for income and negative for expenses.
    pub amount: f64,
    /// The classification of the record.
    pub category: String,
    /// How the money moved.
    pub payment_method: String,
    /// When the record happened.
    pub date: Date,
}

impl NewRecord {
    /// Set the category for the record.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Set the payment method for the record.
    pub fn payment_method(mut self, payment_method: &str) -> Self {
        payment_method.clone_into(&mut self.payment_method);
        self
    }

    /// Attach the ID and owner assigned by the backing service.
    pub fn finalize(self, id: RecordId, user_id: UserId) -> FinancialRecord {
        FinancialRecord {
            id,
            user_id,
            title: self.title,
            amount: self.amount,
            category: self.category,
            payment_method: self.payment_method,
            date: self.date,
        }
    }
}

/// Parse the text a user typed for an amount.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `text` is not a number or is not finite,
/// e.g. "NaN" or "inf".
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    match text.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::InvalidAmount(text.to_owned())),
    }
}

/// Parse the text a user typed for a date in the form `YYYY-MM-DD`.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid calendar date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        record::{FinancialRecord, UserId, parse_amount, parse_date},
    };

    #[test]
    fn user_id_rejects_empty_string() {
        assert_eq!(UserId::new("  "), Err(Error::EmptyUserId));
    }

    #[test]
    fn user_id_trims_whitespace() {
        let user = UserId::new(" user_123 ").unwrap();

        assert_eq!(user.as_str(), "user_123");
    }

    #[test]
    fn builder_sets_all_fields() {
        let user = UserId::new("alice").unwrap();

        let record = FinancialRecord::build("Groceries", -42.5, date!(2024 - 01 - 15))
            .category("Food")
            .payment_method("Cash")
            .finalize(7, user.clone());

        assert_eq!(
            record,
            FinancialRecord {
                id: 7,
                user_id: user,
                title: "Groceries".to_owned(),
                amount: -42.5,
                category: "Food".to_owned(),
                payment_method: "Cash".to_owned(),
                date: date!(2024 - 01 - 15),
            }
        );
    }

    #[test]
    fn zero_amount_is_not_income() {
        let record = FinancialRecord::build("Nothing", 0.0, date!(2024 - 01 - 15))
            .finalize(1, UserId::new("alice").unwrap());

        assert!(!record.is_income());
    }

    #[test]
    fn serializes_with_original_field_names() {
        let record = FinancialRecord::build("Salary", 1000.0, date!(2024 - 02 - 01))
            .category("Salary")
            .payment_method("Bank Transfer")
            .finalize(3, UserId::new("alice").unwrap());

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["_id"], 3);
        assert_eq!(json["userId"], "alice");
        assert_eq!(json["paymentMethod"], "Bank Transfer");
        assert_eq!(json["date"], "2024-02-01");

        let round_trip: FinancialRecord = serde_json::from_value(json).unwrap();
        assert_eq!(round_trip, record);
    }

    #[test]
    fn parse_amount_accepts_signed_decimals() {
        assert_eq!(parse_amount(" -12.50 "), Ok(-12.5));
        assert_eq!(parse_amount("100"), Ok(100.0));
    }

    #[test]
    fn parse_amount_rejects_non_numeric_text() {
        assert_eq!(
            parse_amount("twelve"),
            Err(Error::InvalidAmount("twelve".to_owned()))
        );
        assert_eq!(parse_amount(""), Err(Error::InvalidAmount(String::new())));
        assert_eq!(
            parse_amount("NaN"),
            Err(Error::InvalidAmount("NaN".to_owned()))
        );
    }

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(parse_date("2024-01-15"), Ok(date!(2024 - 01 - 15)));
    }

    #[test]
    fn parse_date_rejects_malformed_dates() {
        assert_eq!(
            parse_date("2024-13-01"),
            Err(Error::InvalidDate("2024-13-01".to_owned()))
        );
        assert_eq!(
            parse_date("15/01/2024"),
            Err(Error::InvalidDate("15/01/2024".to_owned()))
        );
    }
}
