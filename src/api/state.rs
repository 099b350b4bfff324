//! Application state for the salon payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, PayrollConfig};
use crate::run::PayrollRunner;

/// Shared application state.
///
/// Holds the immutable configuration and a runner over it. Each request
/// executes its run synchronously against this shared configuration.
#[derive(Clone)]
pub struct AppState {
    config: Arc<PayrollConfig>,
    runner: PayrollRunner,
}

impl AppState {
    /// Creates a new application state from a loaded configuration.
    pub fn new(loader: ConfigLoader) -> Self {
        let config = Arc::new(loader.config().clone());
        Self {
            runner: PayrollRunner::from_shared(Arc::clone(&config)),
            config,
        }
    }

    /// Returns the payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the runner bound to the configuration.
    pub fn runner(&self) -> &PayrollRunner {
        &self.runner
    }
}
