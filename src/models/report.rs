//! Payroll report models.
//!
//! A [`PayrollReport`] is the assembled output of one run: the per-employee
//! [`PayResult`]s, period metadata, totals, and anything the run could not
//! resolve. Rendering to a flat table happens here so every writer agrees on
//! column names and order.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};

use super::{AuditWarning, PayPeriod, PayResult};

/// Columns every report starts with, in order.
pub const LEADING_COLUMNS: [&str; 7] = [
    "employee_name",
    "employee_type",
    "pay_period_start",
    "pay_period_end",
    "pay_date",
    "total_hours",
    "total_pay",
];

/// Breakdown columns, emitted in this order when any result carries them.
pub const OPTIONAL_COLUMNS: [&str; 10] = [
    "hourly_pay",
    "commission",
    "pay_method",
    "base_pay",
    "tips",
    "addings",
    "discount_deduction",
    "transaction_count",
    "adjustments",
    "final_pay",
];

/// Why a timecard employee could not be fully resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No configured profile matched; the employee has no pay result.
    NoProfile,
    /// No service-provider identifier matched; pay was computed without
    /// any linked transactions.
    NoProviderLink,
}

/// A timecard employee that needs operator attention before payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedEmployee {
    /// The timecard name.
    pub name: String,
    /// Why it was not resolved.
    pub reason: UnresolvedReason,
    /// Hours on the timecard, so operators can see what is at stake.
    pub hours: Decimal,
}

/// Totals across all results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of employees with a pay result.
    pub employee_count: usize,
    /// Sum of hours across results.
    pub total_hours: Decimal,
    /// Sum of final pay across results.
    pub total_payroll: Decimal,
}

/// The assembled output of one payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// Identifier of the run that produced this report.
    pub run_id: Uuid,
    /// The period covered.
    pub pay_period: PayPeriod,
    /// `pay_period.end + 7 days`.
    pub pay_date: NaiveDate,
    /// Per-employee results in processing order.
    pub results: Vec<PayResult>,
    /// Employees that could not be fully resolved.
    pub unresolved: Vec<UnresolvedEmployee>,
    /// Run-level warnings (missing sources, unparsable hours, ...).
    pub warnings: Vec<AuditWarning>,
    /// Totals across results.
    pub summary: ReportSummary,
}

/// A report an operator has signed off on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedReport {
    report: PayrollReport,
}

impl FinalizedReport {
    /// The underlying report.
    pub fn report(&self) -> &PayrollReport {
        &self.report
    }

    /// Consumes the wrapper.
    pub fn into_inner(self) -> PayrollReport {
        self.report
    }
}

/// Rounds a money or hours amount for presentation.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn money_cell(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

impl PayrollReport {
    /// Assembles a report and computes its summary.
    pub fn new(
        run_id: Uuid,
        pay_period: PayPeriod,
        results: Vec<PayResult>,
        unresolved: Vec<UnresolvedEmployee>,
        warnings: Vec<AuditWarning>,
    ) -> Self {
        let summary = ReportSummary {
            employee_count: results.len(),
            total_hours: results.iter().map(|r| r.total_hours).sum(),
            total_payroll: results.iter().map(|r| r.final_pay).sum(),
        };
        Self {
            run_id,
            pay_period,
            pay_date: pay_period.pay_date(),
            results,
            unresolved,
            warnings,
            summary,
        }
    }

    /// Returns true when some employee still needs operator attention.
    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }

    /// Signs off on the report.
    ///
    /// Unresolved employees block finalization unless the operator has
    /// explicitly acknowledged them.
    pub fn finalize(self, acknowledge_unresolved: bool) -> PayrollResult<FinalizedReport> {
        if self.has_unresolved() && !acknowledge_unresolved {
            return Err(PayrollError::UnresolvedEmployees {
                names: self.unresolved.iter().map(|u| u.name.clone()).collect(),
            });
        }
        Ok(FinalizedReport { report: self })
    }

    /// Finds a result by exact timecard name.
    pub fn result_for(&self, employee_name: &str) -> Option<&PayResult> {
        self.results.iter().find(|r| r.employee_name == employee_name)
    }

    /// The report's column names: the leading columns followed by each
    /// optional column that at least one result carries.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = LEADING_COLUMNS.to_vec();
        columns.extend(
            OPTIONAL_COLUMNS
                .iter()
                .copied()
                .filter(|column| self.results.iter().any(|r| optional_cell(r, column).is_some())),
        );
        columns
    }

    /// Renders every result as a row aligned with [`PayrollReport::columns`].
    ///
    /// Money and hours are rounded to two decimals; columns a result does
    /// not carry are left blank.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        self.results
            .iter()
            .map(|result| {
                columns
                    .iter()
                    .map(|column| self.cell(result, column))
                    .collect()
            })
            .collect()
    }

    fn cell(&self, result: &PayResult, column: &str) -> String {
        match column {
            "employee_name" => result.employee_name.clone(),
            "employee_type" => result.employee_type.to_string(),
            "pay_period_start" => self.pay_period.start_date().to_string(),
            "pay_period_end" => self.pay_period.end_date().to_string(),
            "pay_date" => self.pay_date.to_string(),
            "total_hours" => money_cell(result.total_hours),
            "total_pay" => money_cell(result.total_pay),
            other => optional_cell(result, other).unwrap_or_default(),
        }
    }

    /// The summary rendered as `(label, value)` pairs.
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Pay Period Start", self.pay_period.start_date().to_string()),
            ("Pay Period End", self.pay_period.end_date().to_string()),
            ("Pay Date", self.pay_date.to_string()),
            ("Total Employees", self.summary.employee_count.to_string()),
            ("Total Hours", money_cell(self.summary.total_hours)),
            ("Total Payroll", money_cell(self.summary.total_payroll)),
        ]
    }
}

fn optional_cell(result: &PayResult, column: &str) -> Option<String> {
    match column {
        "hourly_pay" => Some(money_cell(result.hourly_pay)),
        "commission" => result.commission.map(money_cell),
        "pay_method" => result.pay_method.map(|m| m.as_str().to_string()),
        "base_pay" => result.base_pay.map(money_cell),
        "tips" => Some(money_cell(result.tips)),
        "addings" => result.addings.map(money_cell),
        "discount_deduction" => result.discount_deduction.map(money_cell),
        "transaction_count" => result.transaction_count.map(|c| c.to_string()),
        "adjustments" => (!result.adjustments.is_empty()).then(|| money_cell(result.adjustments_total)),
        "final_pay" => (!result.adjustments.is_empty()).then(|| money_cell(result.final_pay)),
        _ => None,
    }
}
