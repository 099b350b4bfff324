//! Pay period model.
//!
//! A [`PayPeriod`] is the inclusive date range covered by one timecard and
//! one report run. It is parsed once per run from the timecard source.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Days between the end of a pay period and its pay date.
pub const PAY_DATE_OFFSET_DAYS: i64 = 7;

/// Formats accepted for each side of a pay period range.
const RANGE_DATE_FORMATS: [&str; 4] = ["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];

/// Represents a pay period with an inclusive date range.
///
/// The invariant `start_date <= end_date` is enforced by [`PayPeriod::new`]
/// and by deserialization.
///
/// # Example
///
/// ```
/// use salon_payroll::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::parse_range("Oct 5, 2025 to Oct 18, 2025").unwrap();
/// assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2025, 10, 5).unwrap());
/// assert_eq!(period.pay_date(), NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPayPeriod")]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    end_date: NaiveDate,
}

#[derive(Deserialize)]
struct RawPayPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<RawPayPeriod> for PayPeriod {
    type Error = PayrollError;

    fn try_from(raw: RawPayPeriod) -> Result<Self, Self::Error> {
        PayPeriod::new(raw.start_date, raw.end_date)
    }
}

impl PayPeriod {
    /// Creates a pay period, rejecting ranges where start is after end.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> PayrollResult<Self> {
        if start_date > end_date {
            return Err(PayrollError::InvalidPayPeriod {
                message: format!("start {} is after end {}", start_date, end_date),
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Parses a range such as `"Oct 5, 2025 to Oct 18, 2025"`.
    ///
    /// Each side may use `Oct 5, 2025`, `October 5, 2025`, `2025-10-05` or
    /// `10/05/2025`. Any failure is fatal to the run.
    pub fn parse_range(text: &str) -> PayrollResult<Self> {
        let (start, end) = text
            .split_once(" to ")
            .ok_or_else(|| PayrollError::InvalidPayPeriod {
                message: format!("expected '<start> to <end>', got '{}'", text.trim()),
            })?;
        Self::new(parse_range_date(start)?, parse_range_date(end)?)
    }

    /// The first day of the period.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The last day of the period.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// The date staff are paid for this period.
    pub fn pay_date(&self) -> NaiveDate {
        self.end_date + Duration::days(PAY_DATE_OFFSET_DAYS)
    }

    /// Checks if a date falls within the period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

fn parse_range_date(text: &str) -> PayrollResult<NaiveDate> {
    let text = text.trim();
    RANGE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .ok_or_else(|| PayrollError::InvalidPayPeriod {
            message: format!("unrecognized date '{}'", text),
        })
}
