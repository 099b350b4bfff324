//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from a YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PayrollError, PayrollResult};
use crate::models::EmployeeProfile;

use super::types::{PayrollConfig, PayrollRates, StorageConfig};

/// Loads and provides access to the payroll configuration.
///
/// # File Layout
///
/// ```text
/// payroll:
///   hourly_rate: 14.00
///   senior_stylist_commission_rate: 0.40
///   discount_split_ratio: 0.50
///   linking: auto                  # auto | name | provider_id
///   discount_source: discount_table  # discount_table | transactions
/// storage:
///   root: ./exports
///   tables:
///     transactions: "Transaction details/Transaction details.csv"
/// employees:
///   senior_stylists:
///     - name: Jane Doe
///       pay_type: commission_vs_hourly
///       addings:
///         Keratin: 15.00
///   stylists: []
///   front_desk: []
/// ```
///
/// # Example
///
/// ```no_run
/// use salon_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./payroll.yaml")?;
/// println!("Hourly rate: ${}", loader.rates().hourly_rate);
/// # Ok::<(), salon_payroll::error::PayrollError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// A relative `storage.root` is resolved against the file's directory.
    ///
    /// # Returns
    ///
    /// Returns an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or unknown enum values (`ConfigParseError`)
    /// - A value fails validation (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let mut loader = Self::parse(&content, &path_str)?;

        let storage_root = &mut loader.config.storage.root;
        if storage_root.is_relative() {
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            *storage_root = base.join(&*storage_root);
        }

        info!(
            path = %path_str,
            employees = loader.config.employees.profiles().count(),
            hourly_rate = %loader.config.payroll.hourly_rate,
            commission_rate = %loader.config.payroll.senior_stylist_commission_rate,
            "Loaded payroll configuration"
        );

        Ok(loader)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> PayrollResult<Self> {
        Self::parse(content, "<inline>")
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(mut config: PayrollConfig) -> PayrollResult<Self> {
        config.employees.assign_groups();
        config.validate()?;
        Ok(Self { config })
    }

    fn parse(content: &str, origin: &str) -> PayrollResult<Self> {
        let config: PayrollConfig =
            serde_yaml::from_str(content).map_err(|e| PayrollError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the rate constants.
    pub fn rates(&self) -> &PayrollRates {
        &self.config.payroll
    }

    /// Returns the storage configuration.
    pub fn storage(&self) -> &StorageConfig {
        &self.config.storage
    }

    /// Returns the storage root directory.
    pub fn storage_root(&self) -> PathBuf {
        self.config.storage.root.clone()
    }

    /// Returns every profile in matching priority order.
    pub fn profiles(&self) -> Vec<EmployeeProfile> {
        self.config.employees.profiles().cloned().collect()
    }
}
