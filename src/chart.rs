//! Builds the income vs. expense chart from the monthly aggregation.
//!
//! The chart is an ECharts configuration; call `to_string()` on it to get the
//! JSON option that ECharts expects.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, ItemStyle, Tooltip, Trigger},
    series::bar,
};

use crate::aggregation::MonthlyTotals;

const INCOME_COLOR: &str = "#4c78a8";
const EXPENSE_COLOR: &str = "#e45756";

/// Create a grouped bar chart with one income bar and one expense bar per
/// month of `series`, in the order given.
pub fn income_expense_chart(series: &[MonthlyTotals]) -> Chart {
    let labels: Vec<String> = series
        .iter()
        .map(|totals| totals.month_label.clone())
        .collect();
    let income: Vec<f64> = series.iter().map(|totals| totals.income).collect();
    let expense: Vec<f64> = series.iter().map(|totals| totals.expense).collect();

    Chart::new()
        .title(Title::new().text("Monthly Income vs. Expense"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            bar::Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("Expense")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(expense),
        )
}

#[cfg(test)]
mod tests {
    use crate::{aggregation::MonthlyTotals, chart::income_expense_chart};

    #[test]
    fn chart_contains_labels_and_series() {
        let series = vec![
            MonthlyTotals {
                month_label: "Jan 2024".to_owned(),
                income: 100.0,
                expense: 30.0,
            },
            MonthlyTotals {
                month_label: "Feb 2024".to_owned(),
                income: 0.0,
                expense: 12.5,
            },
        ];

        let options = income_expense_chart(&series).to_string();

        assert!(options.contains("Monthly Income vs. Expense"));
        assert!(options.contains("Jan 2024"));
        assert!(options.contains("Feb 2024"));
        assert!(options.contains("\"Income\""));
        assert!(options.contains("\"Expense\""));
        assert!(options.contains("#e45756"));
    }

    #[test]
    fn chart_of_empty_series_is_valid_json() {
        let options = income_expense_chart(&[]).to_string();

        let parsed: serde_json::Value = serde_json::from_str(&options).unwrap();
        assert!(parsed.is_object());
    }
}
