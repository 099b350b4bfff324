//! Error types for the salon payroll engine.
//!
//! Only failures that abort a run live here. Schema mismatches, unmatched
//! employees and malformed hours degrade to zero and are reported as
//! [`AuditWarning`](crate::models::AuditWarning)s instead.

use thiserror::Error;

/// The main error type for the salon payroll engine.
///
/// # Example
///
/// ```
/// use salon_payroll::error::PayrollError;
///
/// let error = PayrollError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot use.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A data source (table or timecard) could not be read.
    #[error("Data source unavailable '{source_name}': {message}")]
    SourceUnavailable {
        /// The table path or file that failed.
        source_name: String,
        /// The underlying failure.
        message: String,
    },

    /// A data source was read but its contents could not be interpreted.
    #[error("Failed to parse data source '{source_name}': {message}")]
    SourceParseError {
        /// The table path or file that failed.
        source_name: String,
        /// A description of the parse error.
        message: String,
    },

    /// The pay period could not be determined or is inconsistent.
    #[error("Invalid pay period: {message}")]
    InvalidPayPeriod {
        /// A description of the problem.
        message: String,
    },

    /// A report was finalized while employees remained unresolved.
    #[error("{} unresolved employee(s) require acknowledgement: {}", names.len(), names.join(", "))]
    UnresolvedEmployees {
        /// Timecard names that could not be resolved.
        names: Vec<String>,
    },

    /// The report could not be written.
    #[error("Failed to write report '{path}': {message}")]
    ReportWriteError {
        /// Destination path.
        path: String,
        /// The underlying failure.
        message: String,
    },
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PayrollError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = PayrollError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_field() {
        let error = PayrollError::InvalidConfig {
            field: "payroll.discount_split_ratio".to_string(),
            message: "must be between 0 and 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration field 'payroll.discount_split_ratio': must be between 0 and 1"
        );
    }

    #[test]
    fn test_source_unavailable_displays_source() {
        let error = PayrollError::SourceUnavailable {
            source_name: "Transaction details/Transaction details.csv".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Data source unavailable 'Transaction details/Transaction details.csv': No such file or directory"
        );
    }

    #[test]
    fn test_unresolved_employees_lists_names() {
        let error = PayrollError::UnresolvedEmployees {
            names: vec!["Sam Lee".to_string(), "Kim Ho".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "2 unresolved employee(s) require acknowledgement: Sam Lee, Kim Ho"
        );
    }

    #[test]
    fn test_invalid_pay_period_displays_message() {
        let error = PayrollError::InvalidPayPeriod {
            message: "start 2025-10-18 is after end 2025-10-05".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid pay period: start 2025-10-18 is after end 2025-10-05"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PayrollError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_source() -> PayrollResult<()> {
            Err(PayrollError::SourceUnavailable {
                source_name: "t.csv".to_string(),
                message: "gone".to_string(),
            })
        }

        fn propagates_error() -> PayrollResult<()> {
            returns_missing_source()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
