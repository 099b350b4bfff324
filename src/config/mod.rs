//! Configuration loading and management for salon payroll.
//!
//! This module loads rate constants, the employee roster and the export
//! storage layout from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use salon_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./payroll.yaml").unwrap();
//! println!("Senior commission: {}", config.rates().senior_stylist_commission_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DiscountSource, EmployeeRoster, LinkingStrategy, PayrollConfig, PayrollRates, StorageConfig,
    TablePaths,
};
