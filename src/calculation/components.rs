//! Individual pay components.
//!
//! Each function computes one component of an employee's pay from borrowed
//! record subsets and returns it together with the [`AuditStep`] that
//! explains it. Missing columns never fail a calculation: the component is
//! zero and a warning is attached to the result for the caller to record.


use rust_decimal::Decimal;

use crate::models::{
    AddingDetail, AuditStep, AuditWarning, PayMethod, Record, ServiceAddings, Severity,
};

use super::columns::{AmountColumns, Field};

fn missing_column_warning(field: Field, employee: &str, records: usize) -> AuditWarning {
    AuditWarning::new(
        "COLUMN_NOT_FOUND",
        format!(
            "No {} column found; {} linked record(s) for {} contribute 0",
            field.label(),
            records,
            employee
        ),
        Severity::Medium,
    )
}

fn sum_column(records: &[&Record], column: &str) -> Decimal {
    records.iter().map(|r| r.decimal_or_zero(column)).sum()
}

/// The result of the hourly pay calculation.
#[derive(Debug, Clone)]
pub struct HourlyPayResult {
    /// `hours × rate`.
    pub hourly_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates hourly pay as `hours × rate`.
///
/// # Example
///
/// ```
/// use salon_payroll::calculation::calculate_hourly_pay;
/// use rust_decimal::Decimal;
///
/// let result = calculate_hourly_pay(Decimal::new(930, 2), Decimal::new(1400, 2), 1);
/// assert_eq!(result.hourly_pay, Decimal::new(13020, 2));
/// ```
pub fn calculate_hourly_pay(hours: Decimal, rate: Decimal, step_number: u32) -> HourlyPayResult {
    let hourly_pay = hours * rate;
    HourlyPayResult {
        hourly_pay,
        audit_step: AuditStep {
            step_number,
            rule_id: "hourly_pay".to_string(),
            rule_name: "Hourly Pay".to_string(),
            input: serde_json::json!({
                "hours": hours.to_string(),
                "hourly_rate": rate.to_string()
            }),
            output: serde_json::json!({
                "hourly_pay": hourly_pay.to_string()
            }),
            reasoning: format!("{} hours × ${} = ${}", hours, rate, hourly_pay),
        },
    }
}

/// The result of summing an employee's sales.
#[derive(Debug, Clone)]
pub struct SalesResult {
    /// Sum of transaction amounts.
    pub total_sales: Decimal,
    /// Number of linked transactions.
    pub transaction_count: usize,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Set when transactions were linked but no amount source was found.
    pub warning: Option<AuditWarning>,
}

/// Sums the sale amount of every linked transaction.
pub fn calculate_sales(
    employee: &str,
    transactions: &[&Record],
    amount: &AmountColumns,
    step_number: u32,
) -> SalesResult {
    let total_sales: Decimal = transactions.iter().map(|r| amount.amount_of(r)).sum();
    let warning = (amount.is_missing() && !transactions.is_empty())
        .then(|| missing_column_warning(Field::Amount, employee, transactions.len()));

    SalesResult {
        total_sales,
        transaction_count: transactions.len(),
        audit_step: AuditStep {
            step_number,
            rule_id: "total_sales".to_string(),
            rule_name: "Total Sales".to_string(),
            input: serde_json::json!({
                "transaction_count": transactions.len(),
                "amount_source": amount.describe()
            }),
            output: serde_json::json!({
                "total_sales": total_sales.to_string()
            }),
            reasoning: format!(
                "Summed {} over {} linked transaction(s): ${}",
                amount.describe(),
                transactions.len(),
                total_sales
            ),
        },
        warning,
    }
}

/// The result of the commission calculation.
#[derive(Debug, Clone)]
pub struct CommissionResult {
    /// `total_sales × rate`.
    pub commission: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates commission as `total_sales × rate`.
pub fn calculate_commission(total_sales: Decimal, rate: Decimal, step_number: u32) -> CommissionResult {
    let commission = total_sales * rate;
    CommissionResult {
        commission,
        audit_step: AuditStep {
            step_number,
            rule_id: "commission".to_string(),
            rule_name: "Sales Commission".to_string(),
            input: serde_json::json!({
                "total_sales": total_sales.to_string(),
                "commission_rate": rate.to_string()
            }),
            output: serde_json::json!({
                "commission": commission.to_string()
            }),
            reasoning: format!("${} sales × {} = ${}", total_sales, rate, commission),
        },
    }
}

/// The outcome of comparing commission against hourly pay.
#[derive(Debug, Clone)]
pub struct BasePayDecision {
    /// `max(hourly_pay, commission)`.
    pub base_pay: Decimal,
    /// Which side was used.
    pub pay_method: PayMethod,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Picks the greater of commission and hourly pay.
///
/// Commission is used only when strictly greater; a tie pays hourly.
///
/// # Example
///
/// ```
/// use salon_payroll::calculation::choose_base_pay;
/// use salon_payroll::models::PayMethod;
/// use rust_decimal::Decimal;
///
/// let tie = choose_base_pay(Decimal::from(280), Decimal::from(280), 1);
/// assert_eq!(tie.pay_method, PayMethod::Hourly);
/// ```
pub fn choose_base_pay(hourly_pay: Decimal, commission: Decimal, step_number: u32) -> BasePayDecision {
    let (base_pay, pay_method) = if commission > hourly_pay {
        (commission, PayMethod::Commission)
    } else {
        (hourly_pay, PayMethod::Hourly)
    };

    BasePayDecision {
        base_pay,
        pay_method,
        audit_step: AuditStep {
            step_number,
            rule_id: "base_pay".to_string(),
            rule_name: "Commission vs Hourly".to_string(),
            input: serde_json::json!({
                "hourly_pay": hourly_pay.to_string(),
                "commission": commission.to_string()
            }),
            output: serde_json::json!({
                "base_pay": base_pay.to_string(),
                "pay_method": pay_method.as_str()
            }),
            reasoning: match pay_method {
                PayMethod::Commission => format!(
                    "Commission ${} exceeds hourly pay ${}; paying commission",
                    commission, hourly_pay
                ),
                PayMethod::Hourly => format!(
                    "Hourly pay ${} is at least commission ${}; paying hourly",
                    hourly_pay, commission
                ),
            },
        },
    }
}

/// The result of summing tips.
#[derive(Debug, Clone)]
pub struct TipsResult {
    /// Sum of tips.
    pub tips: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Set when transactions were linked but no tip column was found.
    pub warning: Option<AuditWarning>,
}

/// Sums the tip column over linked transactions.
pub fn calculate_tips(
    employee: &str,
    transactions: &[&Record],
    tip_column: Option<&str>,
    step_number: u32,
) -> TipsResult {
    let tips = tip_column
        .map(|column| sum_column(transactions, column))
        .unwrap_or(Decimal::ZERO);
    let warning = (tip_column.is_none() && !transactions.is_empty())
        .then(|| missing_column_warning(Field::Tip, employee, transactions.len()));

    TipsResult {
        tips,
        audit_step: AuditStep {
            step_number,
            rule_id: "tips".to_string(),
            rule_name: "Tips".to_string(),
            input: serde_json::json!({
                "transaction_count": transactions.len(),
                "tip_column": tip_column
            }),
            output: serde_json::json!({
                "tips": tips.to_string()
            }),
            reasoning: match tip_column {
                Some(column) => format!(
                    "Summed '{}' over {} linked transaction(s): ${}",
                    column,
                    transactions.len(),
                    tips
                ),
                None => "No tip column available; tips are $0".to_string(),
            },
        },
        warning,
    }
}

/// The result of the addings calculation.
#[derive(Debug, Clone)]
pub struct AddingsResult {
    /// Sum of all adding subtotals.
    pub total: Decimal,
    /// One entry per configured adding with a non-zero count.
    pub details: Vec<AddingDetail>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Set when addings are configured but no service column was found.
    pub warning: Option<AuditWarning>,
}

/// Pays a fixed amount per transaction whose service label contains a
/// configured substring, ignoring case.
///
/// A transaction matching several configured substrings counts toward each.
pub fn calculate_addings(
    employee: &str,
    transactions: &[&Record],
    service_column: Option<&str>,
    addings: &ServiceAddings,
    step_number: u32,
) -> AddingsResult {
    let labels: Vec<String> = match service_column {
        Some(column) => transactions
            .iter()
            .filter_map(|r| r.text(column).map(|label| label.to_lowercase()))
            .collect(),
        None => Vec::new(),
    };

    let mut details = Vec::new();
    for (service, amount_per) in addings.iter() {
        let needle = service.to_lowercase();
        let count = labels.iter().filter(|label| label.contains(&needle)).count();
        if count > 0 {
            details.push(AddingDetail {
                service: service.clone(),
                count,
                amount_per: *amount_per,
                subtotal: *amount_per * Decimal::from(count),
            });
        }
    }
    let total: Decimal = details.iter().map(|d| d.subtotal).sum();

    let warning = (service_column.is_none() && !addings.is_empty() && !transactions.is_empty())
        .then(|| missing_column_warning(Field::ServiceName, employee, transactions.len()));

    AddingsResult {
        total,
        audit_step: AuditStep {
            step_number,
            rule_id: "addings".to_string(),
            rule_name: "Service Addings".to_string(),
            input: serde_json::json!({
                "configured": addings
                    .iter()
                    .map(|(service, amount)| {
                        serde_json::json!({ "service": service, "amount": amount.to_string() })
                    })
                    .collect::<Vec<_>>(),
                "service_column": service_column,
                "transaction_count": transactions.len()
            }),
            output: serde_json::json!({
                "addings": total.to_string(),
                "matched": details
                    .iter()
                    .map(|d| serde_json::json!({ "service": d.service, "count": d.count }))
                    .collect::<Vec<_>>()
            }),
            reasoning: if addings.is_empty() {
                "No addings configured".to_string()
            } else {
                format!(
                    "{} of {} configured adding(s) matched: ${}",
                    details.len(),
                    addings.len(),
                    total
                )
            },
        },
        details,
        warning,
    }
}

/// The result of the discount deduction calculation.
#[derive(Debug, Clone)]
pub struct DiscountDeductionResult {
    /// Sum of linked discounts before the split.
    pub total_discounts: Decimal,
    /// `total_discounts × split_ratio`.
    pub deduction: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Set when discount records were linked but no discount column was found.
    pub warning: Option<AuditWarning>,
}

/// Charges the employee their share of linked discounts.
///
/// # Example
///
/// ```
/// use salon_payroll::calculation::calculate_discount_deduction;
/// use rust_decimal::Decimal;
///
/// let result = calculate_discount_deduction("Jane", &[], None, Decimal::new(50, 2), 6);
/// assert_eq!(result.deduction, Decimal::ZERO);
/// assert!(result.warning.is_none());
/// ```
pub fn calculate_discount_deduction(
    employee: &str,
    discounts: &[&Record],
    discount_column: Option<&str>,
    split_ratio: Decimal,
    step_number: u32,
) -> DiscountDeductionResult {
    let total_discounts = discount_column
        .map(|column| sum_column(discounts, column))
        .unwrap_or(Decimal::ZERO);
    let deduction = total_discounts * split_ratio;
    let warning = (discount_column.is_none() && !discounts.is_empty())
        .then(|| missing_column_warning(Field::Discount, employee, discounts.len()));

    DiscountDeductionResult {
        total_discounts,
        deduction,
        audit_step: AuditStep {
            step_number,
            rule_id: "discount_deduction".to_string(),
            rule_name: "Discount Split".to_string(),
            input: serde_json::json!({
                "discount_records": discounts.len(),
                "discount_column": discount_column,
                "total_discounts": total_discounts.to_string(),
                "split_ratio": split_ratio.to_string()
            }),
            output: serde_json::json!({
                "discount_deduction": deduction.to_string()
            }),
            reasoning: format!(
                "${} in discounts × {} = ${} deducted",
                total_discounts, split_ratio, deduction
            ),
        },
        warning,
    }
}
