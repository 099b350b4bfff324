//! In-memory sources.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{CellValue, PayPeriod, Record, Table, Timecard};

use super::{TabularSource, TimecardSource, filter_to_period};

/// Tables held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, Table>,
}

impl MemorySource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, returning the source for chaining.
    pub fn with_table(mut self, name: impl Into<String>, table: Table) -> Self {
        self.insert(name, table);
        self
    }

    /// Adds or replaces a table.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        self.tables.insert(name.into(), table);
    }
}

impl TabularSource for MemorySource {
    fn fetch(&self, table: &str, period: Option<&PayPeriod>) -> PayrollResult<Table> {
        let found = self
            .tables
            .get(table)
            .cloned()
            .ok_or_else(|| PayrollError::SourceUnavailable {
                source_name: table.to_string(),
                message: "table not loaded".to_string(),
            })?;
        Ok(match period {
            Some(period) => filter_to_period(found, period),
            None => found,
        })
    }

    fn list_tables(&self) -> PayrollResult<Vec<String>> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// A timecard already in memory.
#[derive(Debug, Clone)]
pub struct MemoryTimecard {
    timecard: Timecard,
}

impl MemoryTimecard {
    /// Wraps a timecard.
    pub fn new(timecard: Timecard) -> Self {
        Self { timecard }
    }
}

impl TimecardSource for MemoryTimecard {
    fn read(&self) -> PayrollResult<Timecard> {
        Ok(self.timecard.clone())
    }
}

/// Builds a table from JSON objects, one per row.
///
/// Columns appear in the order their keys are first seen. Strings and
/// numbers are classified like CSV cells; nulls and absent keys are blank.
///
/// # Example
///
/// ```
/// use salon_payroll::sources::table_from_json_rows;
///
/// let rows = serde_json::json!([
///     { "Stylist": "Jane", "Amount": 120.5 },
///     { "Stylist": "Sam", "Tip": "5" }
/// ]);
/// let rows: Vec<serde_json::Map<String, serde_json::Value>> =
///     serde_json::from_value(rows).unwrap();
/// let table = table_from_json_rows(&rows);
/// assert_eq!(table.columns().len(), 3);
/// assert!(table.rows()[0].get("Tip").unwrap().is_empty());
/// ```
pub fn table_from_json_rows(rows: &[Map<String, Value>]) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            let key = key.trim();
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }

    let records = rows
        .iter()
        .map(|row| {
            let mut values: HashMap<String, CellValue> = columns
                .iter()
                .map(|c| (c.clone(), CellValue::Empty))
                .collect();
            for (key, value) in row {
                values.insert(key.trim().to_string(), json_cell(value));
            }
            Record::new(values)
        })
        .collect();

    Table::new(columns, records)
}

fn json_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::String(text) => CellValue::parse(text),
        Value::Number(number) => CellValue::parse(&number.to_string()),
        Value::Bool(flag) => CellValue::Text(flag.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}
