//! Request types for the salon payroll API.
//!
//! This module defines the JSON request structures for the `/payroll` endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Adjustment, PayPeriod, Timecard, TimecardEntry};
use crate::run::RunInputs;
use crate::sources::{filter_to_period, table_from_json_rows};

/// A table row as a JSON object keyed by column name.
pub type JsonRow = Map<String, Value>;

/// Request body for the `/payroll` endpoint.
///
/// Carries the timecard and the period's exports inline, so the endpoint
/// never touches the storage root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The pay period the timecard covers.
    pub pay_period: PayPeriodRequest,
    /// Timecard rows, one per clock-in.
    pub timecard: Vec<TimecardEntry>,
    /// Transaction rows for the period.
    pub transactions: Vec<JsonRow>,
    /// Discount rows for the period.
    #[serde(default)]
    pub discounts: Vec<JsonRow>,
    /// Service provider rows; omitted when linking by name.
    #[serde(default)]
    pub service_providers: Option<Vec<JsonRow>>,
    /// Manual adjustments.
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

/// Pay period information in a payroll request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayPeriodRequest {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl TryFrom<PayPeriodRequest> for PayPeriod {
    type Error = PayrollError;

    fn try_from(req: PayPeriodRequest) -> Result<Self, Self::Error> {
        PayPeriod::new(req.start_date, req.end_date)
    }
}

impl PayrollRequest {
    /// Converts the request into runner inputs.
    ///
    /// Transaction and discount rows are restricted to the pay period the same
    /// way a storage fetch restricts them.
    pub fn into_inputs(self) -> PayrollResult<RunInputs> {
        let pay_period = PayPeriod::try_from(self.pay_period)?;
        let transactions = filter_to_period(table_from_json_rows(&self.transactions), &pay_period);
        let discounts = filter_to_period(table_from_json_rows(&self.discounts), &pay_period);
        Ok(RunInputs {
            timecard: Timecard {
                pay_period,
                entries: self.timecard,
            },
            transactions,
            discounts,
            providers: self
                .service_providers
                .as_deref()
                .map(table_from_json_rows),
            adjustments: self.adjustments,
        })
    }
}
