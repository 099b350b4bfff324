//! Loosely-structured tabular records.
//!
//! Point-of-sale exports do not share a fixed schema, so a [`Table`] is just
//! an ordered list of column labels plus rows that map a label to a
//! [`CellValue`]. Nothing here knows what an "amount" or a "tip" is; that is
//! the job of [`crate::calculation::ResolvedColumns`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single cell from a source table.
///
/// Raw strings are classified once at ingestion through [`CellValue::parse`].
///
/// # Example
///
/// ```
/// use salon_payroll::models::CellValue;
/// use rust_decimal::Decimal;
///
/// assert_eq!(CellValue::parse("$1,250.50"), CellValue::Number(Decimal::new(125050, 2)));
/// assert_eq!(CellValue::parse("  "), CellValue::Empty);
/// assert_eq!(CellValue::parse("Balayage"), CellValue::Text("Balayage".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A blank or missing cell.
    Empty,
    /// A numeric cell.
    Number(Decimal),
    /// Any other text, including dates.
    Text(String),
}

impl CellValue {
    /// Classifies a raw cell string.
    ///
    /// Blank strings become [`CellValue::Empty`]. Decimal literals become
    /// [`CellValue::Number`], tolerating a leading `$`, thousands separators
    /// and surrounding whitespace. Everything else is kept as trimmed text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let numeric: String = unsigned
            .strip_prefix('$')
            .unwrap_or(unsigned)
            .chars()
            .filter(|c| *c != ',')
            .collect();

        let looks_numeric = !numeric.is_empty()
            && numeric.chars().any(|c| c.is_ascii_digit())
            && numeric.chars().all(|c| c.is_ascii_digit() || c == '.');
        if looks_numeric {
            if let Ok(value) = Decimal::from_str(&numeric) {
                return CellValue::Number(if negative { -value } else { value });
            }
        }

        CellValue::Text(trimmed.to_string())
    }

    /// Returns true for blank cells.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Returns the numeric value, if the cell holds one.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the cell rendered as text; `None` for blank cells.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(value) => Some(Cow::Owned(value.normalize().to_string())),
            CellValue::Text(text) => Some(Cow::Borrowed(text.as_str())),
        }
    }

    /// Returns the key used for exact identifier comparisons.
    ///
    /// Numbers are normalized so that `"42"` and `"42.0"` compare equal.
    pub fn as_key(&self) -> Option<String> {
        self.as_text().map(|text| text.trim().to_string())
    }

    /// Parses the cell as a calendar date.
    ///
    /// Accepts ISO dates, ISO date-times (with `T` or a space), and US style
    /// `m/d/Y` dates with an optional time suffix.
    pub fn as_date(&self) -> Option<NaiveDate> {
        let CellValue::Text(text) = self else {
            return None;
        };
        parse_record_date(text)
    }
}

fn parse_record_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }

    // Only the date part matters; drop any time or offset suffix.
    let date_part = text
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(text);
    ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// One row of a source table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    values: HashMap<String, CellValue>,
}

impl Record {
    /// Creates a record from column/value pairs.
    pub fn new(values: HashMap<String, CellValue>) -> Self {
        Self { values }
    }

    /// Returns the raw cell for a column.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Returns the numeric value of a column, substituting zero for blank,
    /// missing or non-numeric cells.
    pub fn decimal_or_zero(&self, column: &str) -> Decimal {
        self.get(column)
            .and_then(CellValue::as_decimal)
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns the text of a column, or `None` when blank or missing.
    pub fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        self.get(column).and_then(CellValue::as_text)
    }
}

/// A table of records with its column labels in source order.
///
/// # Example
///
/// ```
/// use salon_payroll::models::Table;
///
/// let table = Table::from_rows(
///     vec!["Stylist".to_string(), "Tip".to_string()],
///     vec![vec!["Jane".to_string(), "12.50".to_string()]],
/// );
/// assert!(table.has_column("Tip"));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// An empty table with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a table from already-classified records.
    ///
    /// Duplicate column labels keep their first occurrence.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self {
            columns: dedup_columns(columns),
            rows,
        }
    }

    /// Creates a table from raw string rows aligned with `columns`.
    ///
    /// Short rows are padded with blank cells; extra cells are ignored.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns: Vec<String> = columns.into_iter().map(|c| c.trim().to_string()).collect();
        let records = rows
            .into_iter()
            .map(|row| {
                let mut values = HashMap::with_capacity(columns.len());
                for (index, column) in columns.iter().enumerate() {
                    let cell = row
                        .get(index)
                        .map(|raw| CellValue::parse(raw))
                        .unwrap_or(CellValue::Empty);
                    values.entry(column.clone()).or_insert(cell);
                }
                Record::new(values)
            })
            .collect();
        Self::new(columns, records)
    }

    /// Column labels in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the table has a column with exactly this label.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// All rows.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps only the rows for which `keep` returns true.
    pub fn retain<F: FnMut(&Record) -> bool>(&mut self, keep: F) {
        self.rows.retain(keep);
    }
}

fn dedup_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(columns.len());
    for column in columns {
        if !seen.contains(&column) {
            seen.push(column);
        }
    }
    seen
}
