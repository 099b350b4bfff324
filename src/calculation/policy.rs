//! Pay policies.
//!
//! [`calculate_pay`] combines the components in [`super::components`] into a
//! [`PayResult`] according to the employee's pay type, then applies manual
//! adjustments.

use rust_decimal::Decimal;
use tracing::info;

use crate::config::{DiscountSource, PayrollRates};
use crate::models::{
    Adjustment, AuditStep, AuditWarning, EmployeeProfile, LinkedEmployee, PayResult, PayType,
    Record,
};

use super::columns::{Field, ResolvedColumns};
use super::components::{
    calculate_addings, calculate_commission, calculate_discount_deduction, calculate_hourly_pay,
    calculate_sales, calculate_tips, choose_base_pay,
};
use super::matching::names_match;

/// Effective rates for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayRates {
    /// Profile override or the configured hourly rate.
    pub hourly_rate: Decimal,
    /// Profile override or the configured senior stylist commission rate.
    pub commission_rate: Decimal,
    /// Share of discounts charged back to the employee.
    pub discount_split_ratio: Decimal,
    /// Where discounts are read from.
    pub discount_source: DiscountSource,
}

impl PayRates {
    /// Resolves the rates for a profile, preferring its overrides.
    pub fn for_profile(profile: &EmployeeProfile, rates: &PayrollRates) -> Self {
        Self {
            hourly_rate: profile.hourly_rate.unwrap_or(rates.hourly_rate),
            commission_rate: profile
                .commission_rate
                .unwrap_or(rates.senior_stylist_commission_rate),
            discount_split_ratio: rates.discount_split_ratio,
            discount_source: rates.discount_source,
        }
    }
}

/// Everything one employee's pay is computed from.
#[derive(Debug, Clone, Copy)]
pub struct PayInputs<'a> {
    /// The matched employee and their hours.
    pub employee: &'a LinkedEmployee,
    /// Linked transactions.
    pub transactions: &'a [&'a Record],
    /// Columns resolved for the transaction table.
    pub transaction_columns: &'a ResolvedColumns,
    /// Linked rows of the discount table.
    pub discounts: &'a [&'a Record],
    /// Columns resolved for the discount table.
    pub discount_columns: &'a ResolvedColumns,
    /// Every adjustment entered for the run; those for other employees are
    /// ignored.
    pub adjustments: &'a [Adjustment],
}

/// Computes an employee's pay.
///
/// Hourly employees are paid `hourly_pay + tips`. Commission-vs-hourly
/// employees are paid `max(hourly_pay, commission) + tips + addings -
/// discount_deduction`. Adjustments for the employee are then added to give
/// `final_pay`.
///
/// Component warnings are attached to the result; the caller decides where
/// else to record them.
pub fn calculate_pay(inputs: &PayInputs<'_>, rates: &PayRates) -> PayResult {
    let employee = inputs.employee;
    let name = employee.timecard_name.as_str();
    let profile = &employee.profile;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();

    let hourly = calculate_hourly_pay(employee.hours, rates.hourly_rate, 1);
    let hourly_pay = hourly.hourly_pay;
    steps.push(hourly.audit_step);

    let mut result = match profile.pay_type {
        PayType::Hourly => {
            let tips = calculate_tips(
                name,
                inputs.transactions,
                inputs.transaction_columns.tip,
                step_number(&steps),
            );
            steps.push(tips.audit_step);
            warnings.extend(tips.warning);

            let total_pay = hourly_pay + tips.tips;
            steps.push(total_step(
                step_number(&steps),
                format!("Hourly ${} + tips ${} = ${}", hourly_pay, tips.tips, total_pay),
                total_pay,
            ));

            PayResult {
                employee_name: name.to_string(),
                employee_type: PayType::Hourly,
                group: profile.group,
                total_hours: employee.hours,
                hourly_pay,
                total_sales: None,
                commission: None,
                pay_method: None,
                base_pay: None,
                tips: tips.tips,
                addings: None,
                adding_details: Vec::new(),
                discount_deduction: None,
                total_pay,
                transaction_count: None,
                adjustments: Vec::new(),
                adjustments_total: Decimal::ZERO,
                final_pay: total_pay,
                audit_steps: Vec::new(),
                warnings: Vec::new(),
            }
        }
        PayType::CommissionVsHourly => {
            let columns = inputs.transaction_columns;

            let sales = calculate_sales(
                name,
                inputs.transactions,
                &columns.amount,
                step_number(&steps),
            );
            steps.push(sales.audit_step);
            warnings.extend(sales.warning);

            let commission =
                calculate_commission(sales.total_sales, rates.commission_rate, step_number(&steps));
            steps.push(commission.audit_step);

            let decision =
                choose_base_pay(hourly_pay, commission.commission, step_number(&steps));
            steps.push(decision.audit_step);

            let tips = calculate_tips(name, inputs.transactions, columns.tip, step_number(&steps));
            steps.push(tips.audit_step);
            warnings.extend(tips.warning);

            let addings = calculate_addings(
                name,
                inputs.transactions,
                columns.service_name,
                &profile.addings,
                step_number(&steps),
            );
            steps.push(addings.audit_step);
            warnings.extend(addings.warning);

            let (discount_records, discount_column) = match rates.discount_source {
                DiscountSource::DiscountTable => {
                    (inputs.discounts, inputs.discount_columns.discount)
                }
                // The discount candidates end with the bare amount label,
                // which on a transaction table is the sale amount.
                DiscountSource::Transactions => (
                    inputs.transactions,
                    columns
                        .discount
                        .filter(|column| Some(*column) != columns.get(Field::Amount)),
                ),
            };
            let discount = calculate_discount_deduction(
                name,
                discount_records,
                discount_column,
                rates.discount_split_ratio,
                step_number(&steps),
            );
            steps.push(discount.audit_step);
            warnings.extend(discount.warning);

            let total_pay =
                decision.base_pay + tips.tips + addings.total - discount.deduction;
            steps.push(total_step(
                step_number(&steps),
                format!(
                    "Base ${} + tips ${} + addings ${} - discount ${} = ${}",
                    decision.base_pay, tips.tips, addings.total, discount.deduction, total_pay
                ),
                total_pay,
            ));

            PayResult {
                employee_name: name.to_string(),
                employee_type: PayType::CommissionVsHourly,
                group: profile.group,
                total_hours: employee.hours,
                hourly_pay,
                total_sales: Some(sales.total_sales),
                commission: Some(commission.commission),
                pay_method: Some(decision.pay_method),
                base_pay: Some(decision.base_pay),
                tips: tips.tips,
                addings: Some(addings.total),
                adding_details: addings.details,
                discount_deduction: Some(discount.deduction),
                total_pay,
                transaction_count: Some(sales.transaction_count),
                adjustments: Vec::new(),
                adjustments_total: Decimal::ZERO,
                final_pay: total_pay,
                audit_steps: Vec::new(),
                warnings: Vec::new(),
            }
        }
    };

    let adjustments: Vec<Adjustment> = inputs
        .adjustments
        .iter()
        .filter(|a| names_match(&a.employee, name))
        .cloned()
        .collect();
    if !adjustments.is_empty() {
        let adjustments_total: Decimal = adjustments.iter().map(Adjustment::signed_amount).sum();
        result.final_pay = result.total_pay + adjustments_total;
        steps.push(AuditStep {
            step_number: step_number(&steps),
            rule_id: "adjustments".to_string(),
            rule_name: "Manual Adjustments".to_string(),
            input: serde_json::to_value(&adjustments).unwrap_or_default(),
            output: serde_json::json!({
                "adjustments_total": adjustments_total.to_string(),
                "final_pay": result.final_pay.to_string()
            }),
            reasoning: format!(
                "{} adjustment(s) totalling ${} applied to ${}",
                adjustments.len(),
                adjustments_total,
                result.total_pay
            ),
        });
        result.adjustments_total = adjustments_total;
        result.adjustments = adjustments;
    }

    info!(
        employee = %name,
        employee_type = %result.employee_type,
        hours = %result.total_hours,
        total_pay = %result.total_pay,
        final_pay = %result.final_pay,
        "Calculated pay"
    );

    result.audit_steps = steps;
    result.warnings = warnings;
    result
}

fn step_number(steps: &[AuditStep]) -> u32 {
    steps.len() as u32 + 1
}

fn total_step(step_number: u32, reasoning: String, total_pay: Decimal) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "total_pay".to_string(),
        rule_name: "Total Pay".to_string(),
        input: serde_json::json!({}),
        output: serde_json::json!({
            "total_pay": total_pay.to_string()
        }),
        reasoning,
    }
}
