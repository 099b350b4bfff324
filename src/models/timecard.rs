//! Timecard model.
//!
//! A [`Timecard`] holds the raw entries of one time-clock export. Hours are
//! kept as exported and parsed when totals are taken, so a malformed cell
//! degrades to zero with a warning instead of failing the read.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{is_hours_placeholder, parse_hours};
use crate::context::RunContext;

use super::{PayPeriod, Severity};

/// One row of a timecard export: a single clock-in for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimecardEntry {
    /// Employee name as exported by the time clock.
    pub employee: String,
    /// Role column, if present.
    #[serde(default)]
    pub role: Option<String>,
    /// The day worked, kept as exported.
    #[serde(default)]
    pub entry_date: Option<String>,
    /// Hours worked in the `"<H>h <M>m"` form, or a dash placeholder.
    pub total_hours: String,
}

/// A timecard for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timecard {
    /// The period the timecard covers.
    pub pay_period: PayPeriod,
    /// Individual entries in export order.
    pub entries: Vec<TimecardEntry>,
}

impl TimecardEntry {
    /// The employee name with runs of whitespace collapsed.
    pub fn normalized_employee(&self) -> String {
        self.employee.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Parsed hours for this entry; zero with a warning when unparsable.
    pub fn hours(&self, ctx: &mut RunContext) -> Decimal {
        match parse_hours(&self.total_hours) {
            Some(hours) => hours,
            None => {
                ctx.warn(
                    "HOURS_UNPARSABLE",
                    format!(
                        "Could not parse hours '{}' for {}; counted as 0",
                        self.total_hours.trim(),
                        self.employee.trim()
                    ),
                    Severity::Medium,
                );
                Decimal::ZERO
            }
        }
    }
}

impl Timecard {
    /// Total hours per employee, ordered by name.
    ///
    /// # Example
    ///
    /// ```
    /// use salon_payroll::context::RunContext;
    /// use salon_payroll::models::{PayPeriod, Timecard, TimecardEntry};
    /// use rust_decimal::Decimal;
    ///
    /// let entry = |name: &str, hours: &str| TimecardEntry {
    ///     employee: name.to_string(),
    ///     role: None,
    ///     entry_date: Some("10/06/2025".to_string()),
    ///     total_hours: hours.to_string(),
    /// };
    /// let timecard = Timecard {
    ///     pay_period: PayPeriod::parse_range("Oct 5, 2025 to Oct 18, 2025").unwrap(),
    ///     entries: vec![entry("Sam Lee", "4h 30m"), entry("Sam Lee", "4h 48m")],
    /// };
    /// let hours = timecard.hours_by_employee(&mut RunContext::new());
    /// assert_eq!(hours["Sam Lee"], Decimal::new(930, 2));
    /// ```
    pub fn hours_by_employee(&self, ctx: &mut RunContext) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for entry in &self.entries {
            let name = entry.normalized_employee();
            if name.is_empty() {
                continue;
            }
            let hours = entry.hours(ctx);
            *totals.entry(name).or_insert(Decimal::ZERO) += hours;
        }
        totals
    }

    /// Role, total hours and days worked per employee, ordered by name.
    ///
    /// Placeholder entries still count as a listed day, matching how the
    /// export rows are counted.
    pub fn summary(&self, ctx: &mut RunContext) -> Vec<TimecardSummaryRow> {
        let mut rows: BTreeMap<String, TimecardSummaryRow> = BTreeMap::new();
        for entry in &self.entries {
            let name = entry.normalized_employee();
            if name.is_empty() {
                continue;
            }
            let hours = entry.hours(ctx);
            let row = rows
                .entry(name.clone())
                .or_insert_with(|| TimecardSummaryRow {
                    employee: name,
                    role: None,
                    total_hours: Decimal::ZERO,
                    days_worked: 0,
                    worked_days_with_hours: 0,
                });
            if row.role.is_none() {
                row.role = entry.role.clone().filter(|r| !r.trim().is_empty());
            }
            row.total_hours += hours;
            row.days_worked += 1;
            if !is_hours_placeholder(&entry.total_hours) && hours > Decimal::ZERO {
                row.worked_days_with_hours += 1;
            }
        }
        rows.into_values().collect()
    }
}

/// Per-employee roll-up of a timecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimecardSummaryRow {
    /// Employee name.
    pub employee: String,
    /// Role from the first entry that carries one.
    pub role: Option<String>,
    /// Sum of parsed hours.
    pub total_hours: Decimal,
    /// Number of entries.
    pub days_worked: usize,
    /// Entries that recorded a non-zero duration.
    pub worked_days_with_hours: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(name: &str, role: Option<&str>, hours: &str) -> TimecardEntry {
        TimecardEntry {
            employee: name.to_string(),
            role: role.map(str::to_string),
            entry_date: Some("10/06/2025".to_string()),
            total_hours: hours.to_string(),
        }
    }

    fn timecard(entries: Vec<TimecardEntry>) -> Timecard {
        Timecard {
            pay_period: PayPeriod::parse_range("Oct 5, 2025 to Oct 18, 2025").unwrap(),
            entries,
        }
    }

    #[test]
    fn test_hours_by_employee_sums_and_sorts() {
        let tc = timecard(vec![
            entry("Zoe Park", None, "8h"),
            entry("Ann  Lee", None, "4h 30m"),
            entry("Ann Lee", None, "----"),
            entry("Ann Lee", None, "2h 15m"),
        ]);
        let mut ctx = RunContext::new();
        let hours = tc.hours_by_employee(&mut ctx);

        let names: Vec<&String> = hours.keys().collect();
        assert_eq!(names, vec!["Ann Lee", "Zoe Park"]);
        assert_eq!(hours["Ann Lee"], dec("6.75"));
        assert_eq!(hours["Zoe Park"], dec("8"));
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_unparsable_hours_count_as_zero_with_warning() {
        let tc = timecard(vec![entry("Sam Lee", None, "n/a"), entry("Sam Lee", None, "1h")]);
        let mut ctx = RunContext::new();
        let hours = tc.hours_by_employee(&mut ctx);

        assert_eq!(hours["Sam Lee"], dec("1"));
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].code, "HOURS_UNPARSABLE");
    }

    #[test]
    fn test_blank_employee_rows_are_ignored() {
        let tc = timecard(vec![entry("  ", None, "8h")]);
        assert!(tc.hours_by_employee(&mut RunContext::new()).is_empty());
    }

    #[test]
    fn test_summary_counts_days_and_keeps_first_role() {
        let tc = timecard(vec![
            entry("Sam Lee", Some("Stylist"), "4h"),
            entry("Sam Lee", Some("Front Desk"), "----"),
            entry("Sam Lee", None, "3h 30m"),
        ]);
        let summary = tc.summary(&mut RunContext::new());

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].role.as_deref(), Some("Stylist"));
        assert_eq!(summary[0].total_hours, dec("7.5"));
        assert_eq!(summary[0].days_worked, 3);
        assert_eq!(summary[0].worked_days_with_hours, 2);
    }
}
