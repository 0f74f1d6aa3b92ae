//! Display helpers for amounts and dates.

use numfmt::{Formatter, Precision};
use time::Date;

/// Format `number` as a currency amount with two decimal places, e.g.
/// "₹1,234.50" or "-₹12.00".
///
/// Amounts are rounded to cents first, so sums that drift to a tiny non-zero
/// value like `-3.6e-16` print as "₹0.00".
pub fn currency(number: f64, symbol: &str) -> String {
    let number = (number * 100.0).round() / 100.0;

    // Also catches -0.0 left over from rounding a small negative amount.
    if number == 0.0 {
        return format!("{symbol}0.00");
    }

    let prefix = if number < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_owned()
    };

    // numfmt switches to scientific notation for magnitudes below one.
    if number.abs() < 1.0 {
        return format!("{prefix}{:.2}", number.abs());
    }

    let formatted_string = match Formatter::currency(&prefix) {
        Ok(formatter) => formatter
            .precision(Precision::Decimals(2))
            .fmt_string(number.abs()),
        Err(_) => {
            tracing::warn!("Could not create currency formatter for \"{prefix}\"");
            format!("{prefix}{:.2}", number.abs())
        }
    };

    pad_decimals(formatted_string)
}

// numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3" and "12.00"
// as "12", so they are added back here.
fn pad_decimals(mut formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        Some(point) => {
            let decimals = formatted_string.len() - point - 1;
            for _ in decimals..2 {
                formatted_string.push('0');
            }
        }
        None => formatted_string.push_str(".00"),
    }

    formatted_string
}

/// Format `date` the way the record table shows it, e.g. "15/01/2024".
pub fn display_date(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        format::{currency, display_date, pad_decimals},
        record::{FinancialRecord, RecordId, UserId},
        summary::total_signed,
    };

    fn record(id: RecordId, amount: f64) -> FinancialRecord {
        FinancialRecord::build("Record", amount, date!(2024 - 01 - 01))
            .finalize(id, UserId::new("alice").unwrap())
    }

    #[test]
    fn zero_has_two_decimals() {
        assert_eq!(currency(0.0, "₹"), "₹0.00");
    }

    #[test]
    fn negative_amounts_are_prefixed_with_minus() {
        let formatted = currency(-12.0, "$");

        assert!(formatted.starts_with("-$"), "got {formatted}");
        assert!(formatted.ends_with("12.00"), "got {formatted}");
    }

    #[test]
    fn positive_amounts_have_two_decimals() {
        let formatted = currency(7.5, "$");

        assert!(formatted.starts_with('$'), "got {formatted}");
        assert!(formatted.ends_with("7.50"), "got {formatted}");
    }

    #[test]
    fn sub_cent_amounts_round_to_zero() {
        assert_eq!(currency(0.001, "₹"), "₹0.00");
        assert_eq!(currency(-0.004, "$"), "$0.00");
    }

    #[test]
    fn floating_point_drift_in_totals_prints_as_zero() {
        let records = [record(1, 10.1), record(2, -10.0), record(3, -0.1)];

        let total = total_signed(&records);

        assert_ne!(total, 0.0);
        assert_eq!(currency(total, "₹"), "₹0.00");
    }

    #[test]
    fn amounts_below_one_keep_their_cents() {
        assert_eq!(currency(0.5, "$"), "$0.50");
        assert_eq!(currency(-0.07, "$"), "-$0.07");
    }

    #[test]
    fn amounts_round_to_the_nearest_cent() {
        let formatted = currency(-12.345_6, "$");

        assert!(formatted.starts_with("-$"), "got {formatted}");
        assert!(formatted.ends_with("12.35"), "got {formatted}");
    }

    #[test]
    fn pad_decimals_fills_missing_digits() {
        assert_eq!(pad_decimals("$12".to_owned()), "$12.00");
        assert_eq!(pad_decimals("$12.3".to_owned()), "$12.30");
        assert_eq!(pad_decimals("$12.34".to_owned()), "$12.34");
    }

    #[test]
    fn dates_are_day_month_year() {
        assert_eq!(display_date(date!(2024 - 01 - 05)), "05/01/2024");
    }
}
