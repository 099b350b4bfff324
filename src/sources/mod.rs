//! Data sources for payroll runs.
//!
//! The engine never touches storage directly. It asks a [`TabularSource`]
//! for transaction, discount and provider tables, and a [`TimecardSource`]
//! for hours. Local implementations are provided for a directory of CSV
//! exports, an exported timecard workbook, and in-memory data.

mod adjustments;
mod csv_dir;
mod memory;
mod xlsx;

pub use adjustments::load_adjustments;
pub use csv_dir::CsvDirectorySource;
pub use memory::{MemorySource, MemoryTimecard, table_from_json_rows};
pub use xlsx::{TIMECARD_SHEET, XlsxTimecard, parse_timecard_rows};

use crate::calculation::{Field, resolve_column};
use crate::error::PayrollResult;
use crate::models::{PayPeriod, Table, Timecard};

/// Supplies tables by path.
pub trait TabularSource {
    /// Fetches a table, keeping only rows dated inside `period` when given.
    ///
    /// Fails with `SourceUnavailable` when the table cannot be reached and
    /// `SourceParseError` when it cannot be decoded.
    fn fetch(&self, table: &str, period: Option<&PayPeriod>) -> PayrollResult<Table>;

    /// Lists the tables this source can serve.
    fn list_tables(&self) -> PayrollResult<Vec<String>>;
}

/// Supplies the timecard for a run.
pub trait TimecardSource {
    /// Reads entries and the pay period.
    fn read(&self) -> PayrollResult<Timecard>;
}

/// Keeps the rows whose date column falls inside `period`.
///
/// Rows with blank or unparsable dates are dropped. A table with no
/// recognizable date column is returned unchanged; callers detect that case
/// through [`crate::calculation::ResolvedColumns::date`].
pub fn filter_to_period(mut table: Table, period: &PayPeriod) -> Table {
    let Some(date_column) = resolve_column(&table, Field::Date) else {
        return table;
    };
    table.retain(|row| {
        row.get(date_column)
            .and_then(|cell| cell.as_date())
            .is_some_and(|date| period.contains_date(date))
    });
    table
}
