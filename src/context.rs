//! Per-run context.
//!
//! A [`RunContext`] is created for every payroll run and passed by mutable
//! reference to each stage. It carries the run identifier used in log spans
//! and collects the warnings that end up in the report.

use tracing::warn;
use uuid::Uuid;

use crate::models::{AuditWarning, Severity};

/// Identity and warning sink for one payroll run.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: Uuid,
    warnings: Vec<AuditWarning>,
}

impl RunContext {
    /// Starts a context with a fresh run identifier.
    pub fn new() -> Self {
        Self::with_run_id(Uuid::new_v4())
    }

    /// Starts a context for a known run identifier.
    pub fn with_run_id(run_id: Uuid) -> Self {
        Self {
            run_id,
            warnings: Vec::new(),
        }
    }

    /// The run identifier.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Logs a warning and records it for the report.
    pub fn warn(&mut self, code: &str, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        warn!(run_id = %self.run_id, code, severity = ?severity, "{}", message);
        self.warnings.push(AuditWarning::new(code, message, severity));
    }

    /// Records an already-built warning, logging it as well.
    pub fn record(&mut self, warning: AuditWarning) {
        warn!(
            run_id = %self.run_id,
            code = %warning.code,
            severity = ?warning.severity,
            "{}",
            warning.message
        );
        self.warnings.push(warning);
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[AuditWarning] {
        &self.warnings
    }

    /// Consumes the context, returning its warnings.
    pub fn into_warnings(self) -> Vec<AuditWarning> {
        self.warnings
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
