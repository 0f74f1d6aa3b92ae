//! The editable record grid: column layout, cell rendering and the edit/commit
//! cycle of a single cell.
//!
//! A cell that is being edited holds the raw text typed by the user. When the
//! cell loses focus the text is coerced according to the column's
//! [ValueKind], merged into the record and sent to the store as a full record
//! update.

use std::{fmt::Display, str::FromStr};

use time::Date;

use crate::{
    Error,
    format::display_date,
    record::{FinancialRecord, RecordId, parse_amount, parse_date},
    service::RecordService,
    store::RecordStore,
};

/// The columns of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnId {
    /// The record's title.
    Title,
    /// The signed amount.
    Amount,
    /// The record's category.
    Category,
    /// The record's payment method.
    PaymentMethod,
    /// The record's date, display only.
    Date,
    /// The delete action. Carries no record field.
    Delete,
}

/// The grid's columns in display order.
pub const COLUMNS: [ColumnId; 6] = [
    ColumnId::Title,
    ColumnId::Amount,
    ColumnId::Category,
    ColumnId::PaymentMethod,
    ColumnId::Date,
    ColumnId::Delete,
];

impl ColumnId {
    /// The record field name behind the column, e.g. "paymentMethod".
    pub fn key(self) -> &'static str {
        match self {
            ColumnId::Title => "title",
            ColumnId::Amount => "amount",
            ColumnId::Category => "category",
            ColumnId::PaymentMethod => "paymentMethod",
            ColumnId::Date => "date",
            ColumnId::Delete => "delete",
        }
    }

    /// The column heading, e.g. "Payment Method".
    pub fn header(self) -> &'static str {
        match self {
            ColumnId::Title => "Title",
            ColumnId::Amount => "Amount",
            ColumnId::Category => "Category",
            ColumnId::PaymentMethod => "Payment Method",
            ColumnId::Date => "Date",
            ColumnId::Delete => "Delete",
        }
    }

    /// The kind of value held by the column, `None` for the delete column.
    pub fn value_kind(self) -> Option<ValueKind> {
        match self {
            ColumnId::Title | ColumnId::Category | ColumnId::PaymentMethod => Some(ValueKind::Text),
            ColumnId::Amount => Some(ValueKind::Numeric),
            ColumnId::Date => Some(ValueKind::Date),
            ColumnId::Delete => None,
        }
    }

    /// Whether cells in this column can enter edit mode.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            ColumnId::Title | ColumnId::Amount | ColumnId::Category | ColumnId::PaymentMethod
        )
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for ColumnId {
    type Err = String;

    /// Parse a column from its key or heading, ignoring case, spaces,
    /// dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        COLUMNS
            .into_iter()
            .find(|column| column.key().to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown column \"{s}\""))
    }
}

/// How the text of a cell is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Stored verbatim.
    Text,
    /// A finite decimal number.
    Numeric,
    /// A calendar date in the form `YYYY-MM-DD`.
    Date,
}

/// A typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A text value.
    Text(String),
    /// A numeric value.
    Numeric(f64),
    /// A date value.
    Date(Date),
}

impl CellValue {
    /// Coerce the raw text of a cell into a value of the given kind.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] or [Error::InvalidDate] if `raw` cannot
    /// be read as a number or date respectively.
    pub fn parse(kind: ValueKind, raw: &str) -> Result<Self, Error> {
        match kind {
            ValueKind::Text => Ok(CellValue::Text(raw.to_owned())),
            ValueKind::Numeric => parse_amount(raw).map(CellValue::Numeric),
            ValueKind::Date => parse_date(raw).map(CellValue::Date),
        }
    }

    /// The text an edit input is seeded with.
    pub fn to_edit_text(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Numeric(number) => number.to_string(),
            CellValue::Date(date) => date.to_string(),
        }
    }
}

/// The value of `column` for `record`, `None` for the delete column.
pub fn cell_value(record: &FinancialRecord, column: ColumnId) -> Option<CellValue> {
    match column {
        ColumnId::Title => Some(CellValue::Text(record.title.clone())),
        ColumnId::Amount => Some(CellValue::Numeric(record.amount)),
        ColumnId::Category => Some(CellValue::Text(record.category.clone())),
        ColumnId::PaymentMethod => Some(CellValue::Text(record.payment_method.clone())),
        ColumnId::Date => Some(CellValue::Date(record.date)),
        ColumnId::Delete => None,
    }
}

/// Render the cell of `column` for `record` as display text.
pub fn render_cell(record: &FinancialRecord, column: ColumnId) -> String {
    match cell_value(record, column) {
        Some(CellValue::Text(text)) => text,
        Some(CellValue::Numeric(number)) => number.to_string(),
        Some(CellValue::Date(date)) => display_date(date),
        None => column.header().to_owned(),
    }
}

/// Merge the edited text `raw` for `column` into a copy of `record`.
///
/// Every other field, the ID and the owner are left as they are.
///
/// # Errors
/// Returns:
/// - [Error::NotEditable] if the column cannot be edited,
/// - [Error::InvalidAmount] if an amount is not a finite number.
pub fn merge_field(
    record: &FinancialRecord,
    column: ColumnId,
    raw: &str,
) -> Result<FinancialRecord, Error> {
    let kind = match column.value_kind() {
        Some(kind) if column.is_editable() => kind,
        _ => return Err(Error::NotEditable(column)),
    };

    let mut merged = record.clone();

    match (column, CellValue::parse(kind, raw)?) {
        (ColumnId::Title, CellValue::Text(text)) => merged.title = text,
        (ColumnId::Amount, CellValue::Numeric(amount)) => merged.amount = amount,
        (ColumnId::Category, CellValue::Text(text)) => merged.category = text,
        (ColumnId::PaymentMethod, CellValue::Text(text)) => merged.payment_method = text,
        (column, _) => return Err(Error::NotEditable(column)),
    }

    Ok(merged)
}

/// Whether a cell shows its value or an edit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellState {
    /// The cell shows the rendered value.
    Viewing,
    /// The cell shows an input holding `buffer`.
    Editing {
        /// The text currently typed into the input.
        buffer: String,
    },
}

/// The transient edit state of one grid cell.
///
/// Cells are addressed by record ID, so a cell keeps pointing at the same
/// record however the rows are filtered or sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableCell {
    record_id: RecordId,
    column: ColumnId,
    state: CellState,
}

/// A finished edit, ready to be sent to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCommit {
    /// The ID of the edited record.
    pub id: RecordId,
    /// The full record with the edited field merged in.
    pub record: FinancialRecord,
}

impl EditableCell {
    /// Create a cell for `column` of the record `record_id`, not in edit mode.
    pub fn new(record_id: RecordId, column: ColumnId) -> Self {
        Self {
            record_id,
            column,
            state: CellState::Viewing,
        }
    }

    /// The ID of the record the cell belongs to.
    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    /// The cell's column.
    pub fn column(&self) -> ColumnId {
        self.column
    }

    /// The cell's current state.
    pub fn state(&self) -> &CellState {
        &self.state
    }

    /// Whether the cell is in edit mode.
    pub fn is_editing(&self) -> bool {
        matches!(self.state, CellState::Editing { .. })
    }

    /// The text typed so far, if the cell is in edit mode.
    pub fn buffer(&self) -> Option<&str> {
        match &self.state {
            CellState::Editing { buffer } => Some(buffer),
            CellState::Viewing => None,
        }
    }

    /// Enter edit mode, seeding the input with the current value from
    /// `record`.
    ///
    /// Cells of display-only columns never enter edit mode. Activating a cell
    /// that is already being edited keeps the typed text.
    ///
    /// Returns whether the cell is in edit mode afterwards.
    pub fn activate(&mut self, record: &FinancialRecord) -> bool {
        if !self.column.is_editable() || record.id != self.record_id {
            return false;
        }

        if !self.is_editing() {
            let buffer = cell_value(record, self.column)
                .map(|value| value.to_edit_text())
                .unwrap_or_default();

            self.state = CellState::Editing { buffer };
        }

        true
    }

    /// Replace the typed text. Ignored unless the cell is in edit mode.
    pub fn input(&mut self, text: &str) {
        if let CellState::Editing { buffer } = &mut self.state {
            text.clone_into(buffer);
        }
    }

    /// Leave edit mode and produce the update for `record`, the record the
    /// cell currently belongs to.
    ///
    /// Returns `Ok(None)` if the cell was not being edited. Unchanged text
    /// still produces a commit.
    ///
    /// # Errors
    /// Returns [Error::RecordIdMismatch] if `record` is not the cell's record,
    /// or the error from [merge_field]. On error the cell stays in edit mode
    /// with its text so the user can correct it.
    pub fn blur(&mut self, record: &FinancialRecord) -> Result<Option<CellCommit>, Error> {
        let CellState::Editing { buffer } = &self.state else {
            return Ok(None);
        };

        if record.id != self.record_id {
            return Err(Error::RecordIdMismatch {
                path: self.record_id,
                record: record.id,
            });
        }

        let merged = merge_field(record, self.column, buffer).inspect_err(|error| {
            tracing::warn!(
                "Rejected edit of {} for record {}: {error}",
                self.column,
                self.record_id
            );
        })?;

        self.state = CellState::Viewing;

        Ok(Some(CellCommit {
            id: self.record_id,
            record: merged,
        }))
    }
}

/// Commit `cell` through `store`, as happens when the cell loses focus.
///
/// The cell's record is looked up in the store, so the merge always starts
/// from the latest confirmed copy.
///
/// Returns the updated record, or `None` if the cell was not being edited.
///
/// # Errors
/// Returns [Error::UpdateMissingRecord] if the record is no longer in the
/// store, the error from [EditableCell::blur], or the error from
/// [RecordStore::update].
pub async fn commit_cell<S>(
    store: &mut RecordStore<S>,
    cell: &mut EditableCell,
) -> Result<Option<FinancialRecord>, Error>
where
    S: RecordService,
{
    if !cell.is_editing() {
        return Ok(None);
    }

    let Some(record) = store.get(cell.record_id()).cloned() else {
        return Err(Error::UpdateMissingRecord(cell.record_id()));
    };

    match cell.blur(&record)? {
        Some(commit) => store.update(commit.id, commit.record).await.map(Some),
        None => Ok(None),
    }
}

/// Delete the record behind a grid row.
///
/// # Errors
/// Returns the error from [RecordStore::delete].
pub async fn delete_row<S>(store: &mut RecordStore<S>, id: RecordId) -> Result<(), Error>
where
    S: RecordService,
{
    store.delete(id).await
}

/// One rendered grid row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    /// The ID of the record shown in the row.
    pub id: RecordId,
    /// The display text of each cell, in [COLUMNS] order.
    pub cells: Vec<String>,
}

/// Render `records` into grid rows.
pub fn grid_rows(records: &[FinancialRecord]) -> Vec<GridRow> {
    records
        .iter()
        .map(|record| GridRow {
            id: record.id,
            cells: COLUMNS
                .iter()
                .map(|&column| render_cell(record, column))
                .collect(),
        })
        .collect()
}
