//! Employee profile model and related types.
//!
//! Profiles come from the configured roster. A [`LinkedEmployee`] is what a
//! timecard name becomes once it has been matched to a profile.

use std::fmt;

use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How an employee's base pay is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    /// Paid hours worked at the hourly rate, plus tips.
    #[default]
    Hourly,
    /// Paid the greater of commission on sales or hourly pay, plus tips and
    /// addings, less the discount split.
    CommissionVsHourly,
}

impl PayType {
    /// The label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayType::Hourly => "hourly",
            PayType::CommissionVsHourly => "commission_vs_hourly",
        }
    }
}

impl fmt::Display for PayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The roster list a profile was configured under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeGroup {
    /// Senior stylists, normally on commission vs hourly.
    SeniorStylist,
    /// Stylists.
    #[default]
    Stylist,
    /// Front desk staff.
    FrontDesk,
}

/// Fixed per-service bonuses in the order they were configured.
///
/// Reads and writes as a map of service-label substring to amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceAddings(Vec<(String, Decimal)>);

impl ServiceAddings {
    /// Sets the amount for a service, keeping its original position when it
    /// is already configured.
    pub fn insert(&mut self, service: impl Into<String>, amount: Decimal) {
        let service = service.into();
        match self.0.iter_mut().find(|(s, _)| *s == service) {
            Some(entry) => entry.1 = amount,
            None => self.0.push((service, amount)),
        }
    }

    /// The amount configured for a service.
    pub fn get(&self, service: &str) -> Option<&Decimal> {
        self.0.iter().find(|(s, _)| s == service).map(|(_, amount)| amount)
    }

    /// Services and amounts in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.0.iter().map(|(s, amount)| (s, amount))
    }

    /// Number of configured services.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no services are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Decimal)> for ServiceAddings {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut addings = ServiceAddings::default();
        for (service, amount) in iter {
            addings.insert(service, amount);
        }
        addings
    }
}

impl Serialize for ServiceAddings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (service, amount) in &self.0 {
            map.serialize_entry(service, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ServiceAddings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddingsVisitor;

        impl<'de> Visitor<'de> for AddingsVisitor {
            type Value = ServiceAddings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of service name to amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut addings = ServiceAddings::default();
                while let Some((service, amount)) = access.next_entry::<String, Decimal>()? {
                    addings.insert(service, amount);
                }
                Ok(addings)
            }
        }

        deserializer.deserialize_map(AddingsVisitor)
    }
}

/// An employee's pay configuration.
///
/// # Example
///
/// ```
/// use salon_payroll::models::{EmployeeProfile, PayType};
///
/// let yaml = r#"
/// name: Jane Doe
/// pay_type: commission_vs_hourly
/// addings:
///   Keratin: 15.00
/// "#;
/// let profile: EmployeeProfile = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(profile.pay_type, PayType::CommissionVsHourly);
/// assert!(profile.is_commission_vs_hourly());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Display name; matched against timecards by first name.
    pub name: String,
    /// How base pay is determined.
    #[serde(default)]
    pub pay_type: PayType,
    /// Fixed bonus per occurrence, keyed by a service-label substring.
    #[serde(default)]
    pub addings: ServiceAddings,
    /// Optional override for the configured commission rate.
    #[serde(default)]
    pub commission_rate: Option<Decimal>,
    /// Optional override for the configured hourly rate.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Roster list the profile was loaded from. Set by the config loader.
    #[serde(default, skip_deserializing)]
    pub group: EmployeeGroup,
}

impl EmployeeProfile {
    /// Creates a profile with no overrides or addings.
    pub fn new(name: impl Into<String>, pay_type: PayType, group: EmployeeGroup) -> Self {
        Self {
            name: name.into(),
            pay_type,
            addings: ServiceAddings::default(),
            commission_rate: None,
            hourly_rate: None,
            group,
        }
    }

    /// Returns true if the profile uses the commission-vs-hourly policy.
    pub fn is_commission_vs_hourly(&self) -> bool {
        self.pay_type == PayType::CommissionVsHourly
    }
}

/// A timecard employee matched to exactly one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedEmployee {
    /// The name as it appears on the timecard.
    pub timecard_name: String,
    /// Total hours worked in the period.
    pub hours: Decimal,
    /// The matched profile.
    pub profile: EmployeeProfile,
}

/// Direction of a manual adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Added to pay.
    Bonus,
    /// Subtracted from pay.
    Deduction,
}

/// A manual per-employee adjustment entered for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Employee name; matched by first name like profiles.
    pub employee: String,
    /// Bonus or deduction.
    pub kind: AdjustmentKind,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Free-form note for the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Adjustment {
    /// The adjustment as a signed amount.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            AdjustmentKind::Bonus => self.amount,
            AdjustmentKind::Deduction => -self.amount,
        }
    }
}
