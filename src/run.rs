//! Payroll run orchestration.
//!
//! A run executes in strict sequence: read the timecard, fetch the period's
//! transactions, fetch discounts and provider records, compute pay for each
//! matched employee, and assemble the report. Only the timecard and the
//! transaction fetch may fail a run; every other degradation becomes a
//! warning on the report.

use std::sync::Arc;

use tracing::{info, info_span};

use crate::calculation::{
    EmployeeLinker, Field, PayInputs, PayRates, ResolvedColumns, ResolvedTable, calculate_pay,
    match_profiles, names_match, resolve_column,
};
use crate::config::{DiscountSource, LinkingStrategy, PayrollConfig};
use crate::context::RunContext;
use crate::error::PayrollResult;
use crate::models::{
    Adjustment, EmployeeProfile, PayrollReport, Record, Severity, Table, Timecard,
    UnresolvedEmployee, UnresolvedReason,
};
use crate::sources::{TabularSource, TimecardSource};

/// In-memory inputs for [`PayrollRunner::calculate`].
#[derive(Debug, Clone)]
pub struct RunInputs {
    /// The period's timecard.
    pub timecard: Timecard,
    /// Transactions, already restricted to the period.
    pub transactions: Table,
    /// Discount records; empty when unavailable.
    pub discounts: Table,
    /// Service-provider records, when provider linking may be used.
    pub providers: Option<Table>,
    /// Manual adjustments for this run.
    pub adjustments: Vec<Adjustment>,
}

/// Runs payroll against a configuration.
///
/// # Example
///
/// ```
/// use salon_payroll::config::PayrollConfig;
/// use salon_payroll::context::RunContext;
/// use salon_payroll::models::{EmployeeGroup, EmployeeProfile, PayPeriod, PayType, Table, Timecard, TimecardEntry};
/// use salon_payroll::run::{PayrollRunner, RunInputs};
/// use rust_decimal::Decimal;
///
/// let mut config = PayrollConfig::default();
/// config.employees.front_desk.push(EmployeeProfile::new("Sam Lee", PayType::Hourly, EmployeeGroup::FrontDesk));
///
/// let inputs = RunInputs {
///     timecard: Timecard {
///         pay_period: PayPeriod::parse_range("Oct 5, 2025 to Oct 18, 2025").unwrap(),
///         entries: vec![TimecardEntry {
///             employee: "Sam Lee".to_string(),
///             role: None,
///             entry_date: Some("10/06/2025".to_string()),
///             total_hours: "9h 18m".to_string(),
///         }],
///     },
///     transactions: Table::empty(),
///     discounts: Table::empty(),
///     providers: None,
///     adjustments: vec![],
/// };
///
/// let report = PayrollRunner::new(config).calculate(inputs, RunContext::new());
/// assert_eq!(report.results[0].total_pay, Decimal::new(13020, 2));
/// ```
#[derive(Debug, Clone)]
pub struct PayrollRunner {
    config: Arc<PayrollConfig>,
}

impl PayrollRunner {
    /// Creates a runner for a configuration.
    pub fn new(config: PayrollConfig) -> Self {
        Self::from_shared(Arc::new(config))
    }

    /// Creates a runner sharing an existing configuration.
    pub fn from_shared(config: Arc<PayrollConfig>) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    fn profiles(&self) -> Vec<EmployeeProfile> {
        self.config.employees.profiles().cloned().collect()
    }

    /// Executes a full run against live sources.
    ///
    /// # Errors
    ///
    /// Fails when the timecard cannot be read or its pay period is invalid,
    /// or when the transaction table cannot be fetched. Discount and provider
    /// failures only add warnings.
    pub fn generate<T, S>(
        &self,
        timecard_source: &T,
        tables: &S,
        adjustments: Vec<Adjustment>,
    ) -> PayrollResult<PayrollReport>
    where
        T: TimecardSource + ?Sized,
        S: TabularSource + ?Sized,
    {
        let mut ctx = RunContext::new();
        let span = info_span!("payroll_run", run_id = %ctx.run_id());
        let _guard = span.enter();

        let paths = &self.config.storage.tables;
        let rates = &self.config.payroll;

        info!(step = 1, "Reading timecard");
        let timecard = timecard_source.read()?;
        let period = timecard.pay_period;
        info!(
            start = %period.start_date(),
            end = %period.end_date(),
            entries = timecard.entries.len(),
            "Pay period"
        );

        info!(step = 2, table = %paths.transactions, "Fetching transactions");
        let transactions = tables.fetch(&paths.transactions, Some(&period))?;
        if !transactions.is_empty() && resolve_column(&transactions, Field::Date).is_none() {
            ctx.warn(
                "DATE_COLUMN_NOT_FOUND",
                format!(
                    "No date column in '{}'; all {} transaction(s) were kept",
                    paths.transactions,
                    transactions.len()
                ),
                Severity::Medium,
            );
        }

        info!(step = 3, table = %paths.discounts, "Fetching discounts");
        let discounts = match rates.discount_source {
            DiscountSource::Transactions => Table::empty(),
            DiscountSource::DiscountTable => {
                match tables.fetch(&paths.discounts, Some(&period)) {
                    Ok(discounts) => discounts,
                    Err(e) => {
                        ctx.warn(
                            "DISCOUNTS_UNAVAILABLE",
                            format!("Could not fetch discounts, treating as none: {}", e),
                            Severity::Low,
                        );
                        Table::empty()
                    }
                }
            }
        };

        let providers = match rates.linking {
            LinkingStrategy::Name => None,
            strategy => {
                info!(step = 4, table = %paths.service_providers, "Fetching service providers");
                match tables.fetch(&paths.service_providers, None) {
                    Ok(providers) => Some(providers),
                    Err(e) => {
                        let severity = if strategy == LinkingStrategy::ProviderId {
                            Severity::Medium
                        } else {
                            Severity::Low
                        };
                        ctx.warn(
                            "PROVIDERS_UNAVAILABLE",
                            format!("Could not fetch service providers: {}", e),
                            severity,
                        );
                        None
                    }
                }
            }
        };

        Ok(self.calculate(
            RunInputs {
                timecard,
                transactions,
                discounts,
                providers,
                adjustments,
            },
            ctx,
        ))
    }

    /// Computes pay for every matched employee and assembles the report.
    ///
    /// Employees are processed in timecard name order.
    pub fn calculate(&self, inputs: RunInputs, mut ctx: RunContext) -> PayrollReport {
        let span = info_span!("payroll_calculate", run_id = %ctx.run_id());
        let _guard = span.enter();

        let period = inputs.timecard.pay_period;
        let hours = inputs.timecard.hours_by_employee(&mut ctx);
        info!(employees = hours.len(), "Totalled timecard hours");

        let profiles = self.profiles();
        let (linked, mut unresolved) = match_profiles(&hours, &profiles, &mut ctx);

        let transaction_columns = ResolvedColumns::resolve(&inputs.transactions);
        let discount_columns = ResolvedColumns::resolve(&inputs.discounts);
        let transactions = ResolvedTable::new(&inputs.transactions, &transaction_columns);
        let discounts = ResolvedTable::new(&inputs.discounts, &discount_columns);

        let linker = EmployeeLinker::from_strategy(
            self.config.payroll.linking,
            inputs.providers.as_ref(),
            &linked,
            &mut ctx,
        );
        info!(strategy = linker.strategy_name(), "Linking transactions");

        let mut results = Vec::with_capacity(linked.len());
        for employee in &linked {
            let name = employee.timecard_name.as_str();
            if !linker.is_linked(name) {
                ctx.warn(
                    "PROVIDER_NOT_LINKED",
                    format!(
                        "No service provider matches '{}'; paid without transactions",
                        name
                    ),
                    Severity::High,
                );
                unresolved.push(UnresolvedEmployee {
                    name: name.to_string(),
                    reason: UnresolvedReason::NoProviderLink,
                    hours: employee.hours,
                });
            }

            let employee_transactions: Vec<&Record> = linker.records_for(name, transactions);
            let employee_discounts: Vec<&Record> = linker.records_for(name, discounts);

            let pay_rates = PayRates::for_profile(&employee.profile, &self.config.payroll);
            let result = calculate_pay(
                &PayInputs {
                    employee,
                    transactions: &employee_transactions,
                    transaction_columns: &transaction_columns,
                    discounts: &employee_discounts,
                    discount_columns: &discount_columns,
                    adjustments: &inputs.adjustments,
                },
                &pay_rates,
            );
            for warning in &result.warnings {
                ctx.record(warning.clone());
            }
            results.push(result);
        }

        for adjustment in &inputs.adjustments {
            if !results
                .iter()
                .any(|r| names_match(&adjustment.employee, &r.employee_name))
            {
                ctx.warn(
                    "ADJUSTMENT_UNMATCHED",
                    format!(
                        "Adjustment for '{}' matches no paid employee and was ignored",
                        adjustment.employee
                    ),
                    Severity::Medium,
                );
            }
        }

        let report = PayrollReport::new(ctx.run_id(), period, results, unresolved, ctx.into_warnings());
        info!(
            employees = report.summary.employee_count,
            total_hours = %report.summary.total_hours,
            total_payroll = %report.summary.total_payroll,
            unresolved = report.unresolved.len(),
            warnings = report.warnings.len(),
            "Payroll report assembled"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayrollError;
    use crate::models::{
        AdjustmentKind, EmployeeGroup, PayMethod, PayPeriod, PayType, TimecardEntry,
    };
    use crate::sources::{MemorySource, MemoryTimecard};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn entry(name: &str, hours: &str) -> TimecardEntry {
        TimecardEntry {
            employee: name.to_string(),
            role: None,
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

    fn config(linking: LinkingStrategy) -> PayrollConfig {
        let mut config = PayrollConfig::default();
        config.payroll.linking = linking;
        config.employees.senior_stylists.push(EmployeeProfile::new(
            "Jane Doe",
            PayType::CommissionVsHourly,
            EmployeeGroup::SeniorStylist,
        ));
        config.employees.front_desk.push(EmployeeProfile::new(
            "Sam Lee",
            PayType::Hourly,
            EmployeeGroup::FrontDesk,
        ));
        config
    }

    fn inputs(transactions: Table, discounts: Table, providers: Option<Table>) -> RunInputs {
        RunInputs {
            timecard: timecard(vec![
                entry("Sam Lee", "9h 18m"),
                entry("Jane Doe", "10h"),
                entry("Jane Doe", "10h"),
                entry("Kim Ho", "4h"),
            ]),
            transactions,
            discounts,
            providers,
            adjustments: vec![],
        }
    }

    #[test]
    fn test_calculate_by_name() {
        let transactions = table(
            &["ServiceProvider", "Amount", "Tip"],
            &[&["Jane", "600", "30"], &["Jane D.", "400", "20"], &["Kim", "75", "5"]],
        );
        let discounts = table(&["Employee", "DiscountAmount"], &[&["Jane Doe", "100"]]);
        let runner = PayrollRunner::new(config(LinkingStrategy::Name));

        let report = runner.calculate(inputs(transactions, discounts, None), RunContext::new());

        let names: Vec<&str> = report.results.iter().map(|r| r.employee_name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "Sam Lee"]);

        let jane = report.result_for("Jane Doe").unwrap();
        assert_eq!(jane.total_pay, dec("400.00"));
        assert_eq!(jane.pay_method, Some(PayMethod::Commission));

        let sam = report.result_for("Sam Lee").unwrap();
        assert_eq!(sam.total_pay, dec("130.20"));

        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].name, "Kim Ho");
        assert_eq!(report.unresolved[0].reason, UnresolvedReason::NoProfile);
        assert_eq!(report.summary.total_payroll, dec("530.20"));
        assert_eq!(report.summary.total_hours, dec("29.30"));
    }

    #[test]
    fn test_calculate_by_provider_id_reports_unlinked() {
        let providers = table(
            &["ServiceProviderID", "ServiceProviderFirstName"],
            &[&["7", "Jane"]],
        );
        let transactions = table(
            &["ServiceProviderID", "CCAmount", "CashAmount", "Tip"],
            &[&["7", "500", "500", "50"], &["8", "999", "0", "0"]],
        );
        let runner = PayrollRunner::new(config(LinkingStrategy::Auto));

        let report = runner.calculate(
            inputs(transactions, Table::empty(), Some(providers)),
            RunContext::new(),
        );

        let jane = report.result_for("Jane Doe").unwrap();
        assert_eq!(jane.total_sales, Some(dec("1000")));
        assert_eq!(jane.total_pay, dec("450.00"));

        let sam = report.result_for("Sam Lee").unwrap();
        assert_eq!(sam.total_pay, dec("130.20"));
        assert!(
            report
                .unresolved
                .iter()
                .any(|u| u.name == "Sam Lee" && u.reason == UnresolvedReason::NoProviderLink)
        );
    }

    #[test]
    fn test_unmatched_adjustment_warns() {
        let runner = PayrollRunner::new(config(LinkingStrategy::Name));
        let mut run_inputs = inputs(Table::empty(), Table::empty(), None);
        run_inputs.adjustments = vec![Adjustment {
            employee: "Nobody".to_string(),
            kind: AdjustmentKind::Bonus,
            amount: dec("10"),
            reason: None,
        }];

        let report = runner.calculate(run_inputs, RunContext::new());
        assert!(report.warnings.iter().any(|w| w.code == "ADJUSTMENT_UNMATCHED"));
    }

    #[test]
    fn test_generate_tolerates_missing_discounts() {
        let paths = PayrollConfig::default().storage.tables;
        let source = MemorySource::new().with_table(
            paths.transactions.clone(),
            table(
                &["Date", "Stylist", "Amount"],
                &[&["2025-10-06", "Jane", "1000"], &["2025-09-01", "Jane", "5000"]],
            ),
        );
        let timecard = MemoryTimecard::new(timecard(vec![entry("Jane Doe", "20h")]));
        let runner = PayrollRunner::new(config(LinkingStrategy::Name));

        let report = runner.generate(&timecard, &source, vec![]).unwrap();

        assert_eq!(report.result_for("Jane Doe").unwrap().total_pay, dec("400.00"));
        assert!(report.warnings.iter().any(|w| w.code == "DISCOUNTS_UNAVAILABLE"));
    }

    #[test]
    fn test_generate_fails_without_transactions() {
        let timecard = MemoryTimecard::new(timecard(vec![entry("Jane Doe", "20h")]));
        let runner = PayrollRunner::new(config(LinkingStrategy::Name));

        let result = runner.generate(&timecard, &MemorySource::new(), vec![]);
        assert!(matches!(result, Err(PayrollError::SourceUnavailable { .. })));
    }
}
