//! Timecard workbooks exported by the time clock.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use tracing::info;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayPeriod, Timecard, TimecardEntry};

use super::TimecardSource;

/// Sheet holding the timecard.
pub const TIMECARD_SHEET: &str = "TimeCard";

const EMPLOYEE_HEADER: &str = "Employee";
const ROLE_HEADER: &str = "Role";
const ENTRY_DATE_HEADER: &str = "Entry Date";
const TOTAL_HOURS_HEADER: &str = "Total Hours";

/// Reads the `TimeCard` sheet of an `.xlsx` export.
///
/// # Layout
///
/// ```text
/// row 1..n  title rows; one holds "Oct 5, 2025 to Oct 18, 2025"
/// header    Employee | Role | Entry Date | ... | Total Hours
/// data      one row per clock-in; a trailing totals row has no employee
/// ```
#[derive(Debug, Clone)]
pub struct XlsxTimecard {
    path: PathBuf,
}

impl XlsxTimecard {
    /// Creates a reader for the workbook at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The workbook path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TimecardSource for XlsxTimecard {
    fn read(&self) -> PayrollResult<Timecard> {
        let source_name = self.path.display().to_string();

        let mut workbook =
            open_workbook_auto(&self.path).map_err(|e| PayrollError::SourceUnavailable {
                source_name: source_name.clone(),
                message: e.to_string(),
            })?;
        let range = workbook
            .worksheet_range(TIMECARD_SHEET)
            .map_err(|e| PayrollError::SourceParseError {
                source_name: source_name.clone(),
                message: format!("sheet '{}': {}", TIMECARD_SHEET, e),
            })?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        let timecard = parse_timecard_rows(&rows, &source_name)?;
        info!(
            path = %source_name,
            entries = timecard.entries.len(),
            start = %timecard.pay_period.start_date(),
            end = %timecard.pay_period.end_date(),
            "Loaded timecard"
        );
        Ok(timecard)
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Interprets the cell grid of a timecard sheet.
///
/// The pay period is the first cell above the header row that parses as a
/// range. The header row is the first row with both `Employee` and
/// `Total Hours`. Rows with no employee or no entry date are skipped.
pub fn parse_timecard_rows(rows: &[Vec<String>], source_name: &str) -> PayrollResult<Timecard> {
    let header_index = rows
        .iter()
        .position(|row| {
            let has = |label: &str| row.iter().any(|cell| cell.trim() == label);
            has(EMPLOYEE_HEADER) && has(TOTAL_HOURS_HEADER)
        })
        .ok_or_else(|| PayrollError::SourceParseError {
            source_name: source_name.to_string(),
            message: format!(
                "no header row with '{}' and '{}'",
                EMPLOYEE_HEADER, TOTAL_HOURS_HEADER
            ),
        })?;

    let pay_period = rows[..header_index]
        .iter()
        .flatten()
        .find_map(|cell| {
            let cell = cell.trim();
            cell.contains(" to ")
                .then(|| PayPeriod::parse_range(cell).ok())
                .flatten()
        })
        .ok_or_else(|| PayrollError::InvalidPayPeriod {
            message: format!("no pay period range found above the header in {}", source_name),
        })?;

    let header = &rows[header_index];
    let column = |label: &str| header.iter().position(|cell| cell.trim() == label);
    // Both are present: the header row was chosen for containing them.
    let employee_col = column(EMPLOYEE_HEADER).unwrap_or_default();
    let hours_col = column(TOTAL_HOURS_HEADER).unwrap_or_default();
    let role_col = column(ROLE_HEADER);
    let entry_date_col = column(ENTRY_DATE_HEADER);

    let cell = |row: &[String], index: usize| -> Option<String> {
        row.get(index)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let entries = rows[header_index + 1..]
        .iter()
        .filter_map(|row| {
            let employee = cell(row, employee_col)?;
            let entry_date = match entry_date_col {
                Some(index) => Some(cell(row, index)?),
                None => None,
            };
            Some(TimecardEntry {
                employee,
                role: role_col.and_then(|index| cell(row, index)),
                entry_date,
                total_hours: cell(row, hours_col).unwrap_or_default(),
            })
        })
        .collect();

    Ok(Timecard {
        pay_period,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_export_layout() {
        let rows = grid(&[
            &["Time Card Report", ""],
            &["Oct 5, 2025 to Oct 18, 2025", ""],
            &["", ""],
            &["Employee", "Role", "Entry Date", "Clock In", "Total Hours"],
            &["Jane Doe", "Stylist", "10/06/2025", "9:00 AM", "9h 18m"],
            &["Jane Doe", "Stylist", "10/07/2025", "", "----"],
            &["", "", "", "", "9h 18m"],
            &["Sam Lee", "", "", "", "3h"],
        ]);

        let timecard = parse_timecard_rows(&rows, "timecard.xlsx").unwrap();
        assert_eq!(
            timecard.pay_period.start_date(),
            NaiveDate::from_ymd_opt(2025, 10, 5).unwrap()
        );
        assert_eq!(timecard.entries.len(), 2);
        assert_eq!(timecard.entries[0].total_hours, "9h 18m");
        assert_eq!(timecard.entries[0].role.as_deref(), Some("Stylist"));
        assert_eq!(timecard.entries[1].total_hours, "----");
    }

    #[test]
    fn test_missing_header_is_parse_error() {
        let rows = grid(&[&["Oct 5, 2025 to Oct 18, 2025"], &["Name", "Hours"]]);
        let result = parse_timecard_rows(&rows, "timecard.xlsx");
        assert!(matches!(result, Err(PayrollError::SourceParseError { .. })));
    }

    #[test]
    fn test_missing_period_is_fatal() {
        let rows = grid(&[&["Report"], &["Employee", "Total Hours"], &["Jane", "1h"]]);
        let result = parse_timecard_rows(&rows, "timecard.xlsx");
        assert!(matches!(result, Err(PayrollError::InvalidPayPeriod { .. })));
    }

    #[test]
    fn test_unreadable_workbook_is_unavailable() {
        let result = XlsxTimecard::new("/nonexistent/timecard.xlsx").read();
        assert!(matches!(result, Err(PayrollError::SourceUnavailable { .. })));
    }
}
