//! HTTP API module for the salon payroll engine.
//!
//! This module provides the REST endpoint that runs payroll over a timecard
//! and inline exports posted as JSON.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{JsonRow, PayPeriodRequest, PayrollRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
