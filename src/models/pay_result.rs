//! Pay result models.
//!
//! This module contains the [`PayResult`] type and the audit structures that
//! record how each component of an employee's pay was derived.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Adjustment, EmployeeGroup, PayType};

/// Which side of commission-vs-hourly won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayMethod {
    /// Commission was strictly greater than hourly pay.
    Commission,
    /// Hourly pay was greater than or equal to commission.
    Hourly,
}

impl PayMethod {
    /// The label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayMethod::Commission => "commission",
            PayMethod::Hourly => "hourly",
        }
    }
}

/// One configured adding that matched at least one transaction.
///
/// # Example
///
/// ```
/// use salon_payroll::models::AddingDetail;
/// use rust_decimal::Decimal;
///
/// let detail = AddingDetail {
///     service: "Keratin".to_string(),
///     count: 3,
///     amount_per: Decimal::new(1500, 2),
///     subtotal: Decimal::new(4500, 2),
/// };
/// assert_eq!(detail.subtotal, detail.amount_per * Decimal::from(detail.count));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddingDetail {
    /// The configured service-label substring.
    pub service: String,
    /// Number of linked transactions whose label contains it.
    pub count: usize,
    /// Fixed amount paid per occurrence.
    pub amount_per: Decimal,
    /// `count × amount_per`.
    pub subtotal: Decimal,
}

/// A single step in the audit trail recording a pay rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number within one employee's calculation.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// How much attention a warning needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; the run is unaffected.
    Low,
    /// A pay component defaulted to zero.
    Medium,
    /// An employee could not be paid as configured.
    High,
}

/// A degradation recorded during a run.
///
/// Warnings indicate inputs the engine had to work around, such as a missing
/// column or an unmatched employee, so operators can audit the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: Severity,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// One employee's computed pay breakdown for a period.
///
/// Fields that only apply to commission-vs-hourly employees are `None` for
/// hourly employees, which is what decides the optional report columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayResult {
    /// Name as it appears on the timecard.
    pub employee_name: String,
    /// The pay policy applied.
    pub employee_type: PayType,
    /// Roster list the profile came from.
    pub group: EmployeeGroup,
    /// Total hours worked.
    pub total_hours: Decimal,
    /// `total_hours × hourly_rate`.
    pub hourly_pay: Decimal,
    /// Sum of sales across linked transactions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<Decimal>,
    /// `total_sales × commission_rate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<Decimal>,
    /// Which of commission or hourly pay was used as base pay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_method: Option<PayMethod>,
    /// `max(hourly_pay, commission)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_pay: Option<Decimal>,
    /// Sum of tips across linked transactions.
    pub tips: Decimal,
    /// Total of fixed per-service bonuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addings: Option<Decimal>,
    /// Addings that matched, one entry per configured service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adding_details: Vec<AddingDetail>,
    /// Share of linked discounts charged back to the employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_deduction: Option<Decimal>,
    /// Pay before manual adjustments.
    pub total_pay: Decimal,
    /// Number of linked transactions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<usize>,
    /// Manual adjustments applied to this employee.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<Adjustment>,
    /// Net of bonuses and deductions.
    pub adjustments_total: Decimal,
    /// `total_pay + adjustments_total`.
    pub final_pay: Decimal,
    /// How each component was derived.
    pub audit_steps: Vec<AuditStep>,
    /// Degradations hit while computing this employee.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AuditWarning>,
}
