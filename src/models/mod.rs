//! Core data models for the salon payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod pay_period;
mod pay_result;
mod report;
mod table;
mod timecard;

pub use employee::{
    Adjustment, AdjustmentKind, EmployeeGroup, EmployeeProfile, LinkedEmployee, PayType,
    ServiceAddings,
};
pub use pay_period::{PAY_DATE_OFFSET_DAYS, PayPeriod};
pub use pay_result::{AddingDetail, AuditStep, AuditWarning, PayMethod, PayResult, Severity};
pub use report::{
    FinalizedReport, LEADING_COLUMNS, OPTIONAL_COLUMNS, PayrollReport, ReportSummary,
    UnresolvedEmployee, UnresolvedReason, round_money,
};
pub use table::{CellValue, Record, Table};
pub use timecard::{Timecard, TimecardEntry, TimecardSummaryRow};
