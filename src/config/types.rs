//! Configuration types for salon payroll.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{EmployeeGroup, EmployeeProfile};

/// How employees are linked to their transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkingStrategy {
    /// Use provider identifiers when a usable provider table is available,
    /// otherwise fall back to names.
    #[default]
    Auto,
    /// Match first names against the identity column of each record.
    Name,
    /// Link names to provider identifiers once, then match identifiers exactly.
    ProviderId,
}

/// Where discount amounts charged back to stylists are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountSource {
    /// The separate discount details table.
    #[default]
    DiscountTable,
    /// The discount column of the employee's own transactions.
    Transactions,
}

fn default_hourly_rate() -> Decimal {
    Decimal::new(1400, 2)
}

fn default_commission_rate() -> Decimal {
    Decimal::new(40, 2)
}

fn default_discount_split_ratio() -> Decimal {
    Decimal::new(50, 2)
}

/// Rate constants and rule switches for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRates {
    /// Base hourly rate for all employees.
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: Decimal,
    /// Commission rate for commission-vs-hourly employees (0.40 = 40%).
    #[serde(default = "default_commission_rate")]
    pub senior_stylist_commission_rate: Decimal,
    /// Fraction of a customer discount charged back to the stylist.
    #[serde(default = "default_discount_split_ratio")]
    pub discount_split_ratio: Decimal,
    /// Transaction linking strategy.
    #[serde(default)]
    pub linking: LinkingStrategy,
    /// Discount source.
    #[serde(default)]
    pub discount_source: DiscountSource,
}

impl Default for PayrollRates {
    fn default() -> Self {
        Self {
            hourly_rate: default_hourly_rate(),
            senior_stylist_commission_rate: default_commission_rate(),
            discount_split_ratio: default_discount_split_ratio(),
            linking: LinkingStrategy::default(),
            discount_source: DiscountSource::default(),
        }
    }
}

/// The configured employee roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRoster {
    /// Senior stylists.
    #[serde(default)]
    pub senior_stylists: Vec<EmployeeProfile>,
    /// Stylists.
    #[serde(default)]
    pub stylists: Vec<EmployeeProfile>,
    /// Front desk staff.
    #[serde(default)]
    pub front_desk: Vec<EmployeeProfile>,
}

impl EmployeeRoster {
    /// Stamps each profile with the list it was configured under.
    pub fn assign_groups(&mut self) {
        for profile in &mut self.senior_stylists {
            profile.group = EmployeeGroup::SeniorStylist;
        }
        for profile in &mut self.stylists {
            profile.group = EmployeeGroup::Stylist;
        }
        for profile in &mut self.front_desk {
            profile.group = EmployeeGroup::FrontDesk;
        }
    }

    /// All profiles in matching priority order: senior stylists, stylists,
    /// then front desk.
    pub fn profiles(&self) -> impl Iterator<Item = &EmployeeProfile> {
        self.senior_stylists
            .iter()
            .chain(self.stylists.iter())
            .chain(self.front_desk.iter())
    }
}

fn default_transactions_table() -> String {
    "Transaction details/Transaction details.csv".to_string()
}

fn default_discounts_table() -> String {
    "Discount details/Discount details.csv".to_string()
}

fn default_service_providers_table() -> String {
    "Service provider details/Service provider details.csv".to_string()
}

fn default_storage_root() -> PathBuf {
    PathBuf::from(".")
}

/// Table paths relative to the storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePaths {
    /// Transaction details table.
    #[serde(default = "default_transactions_table")]
    pub transactions: String,
    /// Discount details table.
    #[serde(default = "default_discounts_table")]
    pub discounts: String,
    /// Service provider details table.
    #[serde(default = "default_service_providers_table")]
    pub service_providers: String,
}

impl Default for TablePaths {
    fn default() -> Self {
        Self {
            transactions: default_transactions_table(),
            discounts: default_discounts_table(),
            service_providers: default_service_providers_table(),
        }
    }
}

/// Where tabular exports are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory mirroring the export container. Relative paths are resolved
    /// against the configuration file's directory.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Table locations under `root`.
    #[serde(default)]
    pub tables: TablePaths,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            tables: TablePaths::default(),
        }
    }
}

/// The complete payroll configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Rates and rule switches.
    #[serde(default)]
    pub payroll: PayrollRates,
    /// Employee roster.
    #[serde(default)]
    pub employees: EmployeeRoster,
    /// Export storage location.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl PayrollConfig {
    /// Checks values serde cannot express: non-negative rates, a split
    /// ratio within `[0, 1]`, named profiles and non-negative addings.
    pub fn validate(&self) -> PayrollResult<()> {
        let rates = &self.payroll;
        non_negative("payroll.hourly_rate", rates.hourly_rate)?;
        non_negative(
            "payroll.senior_stylist_commission_rate",
            rates.senior_stylist_commission_rate,
        )?;
        if rates.discount_split_ratio < Decimal::ZERO || rates.discount_split_ratio > Decimal::ONE
        {
            return Err(PayrollError::InvalidConfig {
                field: "payroll.discount_split_ratio".to_string(),
                message: format!("must be between 0 and 1, got {}", rates.discount_split_ratio),
            });
        }

        for profile in self.employees.profiles() {
            if profile.name.trim().is_empty() {
                return Err(PayrollError::InvalidConfig {
                    field: "employees.name".to_string(),
                    message: "profile names must not be empty".to_string(),
                });
            }
            if let Some(rate) = profile.commission_rate {
                non_negative(&format!("employees.{}.commission_rate", profile.name), rate)?;
            }
            if let Some(rate) = profile.hourly_rate {
                non_negative(&format!("employees.{}.hourly_rate", profile.name), rate)?;
            }
            for (service, amount) in profile.addings.iter() {
                non_negative(
                    &format!("employees.{}.addings.{}", profile.name, service),
                    *amount,
                )?;
            }
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: Decimal) -> PayrollResult<()> {
    if value < Decimal::ZERO {
        return Err(PayrollError::InvalidConfig {
            field: field.to_string(),
            message: format!("must not be negative, got {}", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rates_default_to_house_values() {
        let rates = PayrollRates::default();
        assert_eq!(rates.hourly_rate, dec("14.00"));
        assert_eq!(rates.senior_stylist_commission_rate, dec("0.40"));
        assert_eq!(rates.discount_split_ratio, dec("0.50"));
        assert_eq!(rates.linking, LinkingStrategy::Auto);
        assert_eq!(rates.discount_source, DiscountSource::DiscountTable);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: PayrollConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.payroll, PayrollRates::default());
        assert_eq!(
            config.storage.tables.transactions,
            "Transaction details/Transaction details.csv"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_roster_profiles_follow_priority_order() {
        let yaml = r#"
employees:
  front_desk:
    - name: Alex Front
  senior_stylists:
    - name: Jane Doe
      pay_type: commission_vs_hourly
  stylists:
    - name: Sam Lee
"#;
        let mut config: PayrollConfig = serde_yaml::from_str(yaml).unwrap();
        config.employees.assign_groups();
        let names: Vec<&str> = config.employees.profiles().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "Sam Lee", "Alex Front"]);

        let groups: Vec<EmployeeGroup> = config.employees.profiles().map(|p| p.group).collect();
        assert_eq!(
            groups,
            vec![
                EmployeeGroup::SeniorStylist,
                EmployeeGroup::Stylist,
                EmployeeGroup::FrontDesk
            ]
        );
    }

    #[test]
    fn test_validate_rejects_split_ratio_above_one() {
        let mut config = PayrollConfig::default();
        config.payroll.discount_split_ratio = dec("1.5");
        match config.validate() {
            Err(PayrollError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "payroll.discount_split_ratio");
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_adding() {
        let mut profile = EmployeeProfile::new(
            "Jane Doe",
            crate::models::PayType::CommissionVsHourly,
            EmployeeGroup::SeniorStylist,
        );
        profile.addings.insert("Keratin".to_string(), dec("-1"));
        let mut config = PayrollConfig::default();
        config.employees.senior_stylists.push(profile);

        match config.validate() {
            Err(PayrollError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "employees.Jane Doe.addings.Keratin");
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_blank_profile_name() {
        let mut config = PayrollConfig::default();
        config.employees.stylists.push(EmployeeProfile::new(
            "  ",
            crate::models::PayType::Hourly,
            EmployeeGroup::Stylist,
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_linking_strategy_deserialization() {
        let rates: PayrollRates =
            serde_yaml::from_str("linking: provider_id\ndiscount_source: transactions").unwrap();
        assert_eq!(rates.linking, LinkingStrategy::ProviderId);
        assert_eq!(rates.discount_source, DiscountSource::Transactions);
    }
}
