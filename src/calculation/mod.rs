//! Calculation logic for the salon payroll engine.
//!
//! This module contains column discovery for loosely-structured exports,
//! timecard hours parsing, employee matching and record linking, the
//! individual pay components and the pay policies that combine them.

mod columns;
mod components;
mod hours;
mod linker;
mod matching;
mod policy;

pub use columns::{
    AmountColumns, Field, PAYMENT_SPLIT_COLUMNS, ResolvedColumns, ResolvedTable, resolve_column,
};
pub use components::{
    AddingsResult, BasePayDecision, CommissionResult, DiscountDeductionResult, HourlyPayResult,
    SalesResult, TipsResult, calculate_addings, calculate_commission,
    calculate_discount_deduction, calculate_hourly_pay, calculate_sales, calculate_tips,
    choose_base_pay,
};
pub use hours::{is_hours_placeholder, parse_hours};
pub use linker::{EmployeeLinker, ProviderLinks};
pub use matching::{first_token, loosely_matches, match_profiles, names_match};
pub use policy::{PayInputs, PayRates, calculate_pay};
