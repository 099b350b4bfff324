//! Employee name matching.
//!
//! Two rules are used. Timecard names are matched to configured profiles by
//! case-insensitive first-name equality. Records are matched to employees by
//! first-name containment in either direction, since exports often carry a
//! shortened or extended form of the name.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::info;

use crate::context::RunContext;
use crate::models::{
    EmployeeProfile, LinkedEmployee, Severity, UnresolvedEmployee, UnresolvedReason,
};

/// The lowercased first whitespace-separated token of a name.
pub fn first_token(name: &str) -> Option<String> {
    name.split_whitespace().next().map(str::to_lowercase)
}

/// Returns true if both names share the same first token, ignoring case.
///
/// # Example
///
/// ```
/// use salon_payroll::calculation::names_match;
///
/// assert!(names_match("Jane Doe", "jane D."));
/// assert!(!names_match("Jane Doe", "Janet Doe"));
/// assert!(!names_match("", "Jane"));
/// ```
pub fn names_match(a: &str, b: &str) -> bool {
    match (first_token(a), first_token(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Returns true if `token` and `value` contain one another, ignoring case
/// and surrounding whitespace. Blank values never match.
///
/// # Example
///
/// ```
/// use salon_payroll::calculation::loosely_matches;
///
/// assert!(loosely_matches("jane", "Jane Doe"));
/// assert!(loosely_matches("janet", "Jan"));
/// assert!(!loosely_matches("jane", "   "));
/// ```
pub fn loosely_matches(token: &str, value: &str) -> bool {
    let token = token.trim().to_lowercase();
    let value = value.trim().to_lowercase();
    if token.is_empty() || value.is_empty() {
        return false;
    }
    value.contains(&token) || token.contains(&value)
}

/// Matches each timecard employee to the first profile sharing their first
/// name.
///
/// `profiles` must already be in priority order. Employees with no matching
/// profile are returned as unresolved with [`UnresolvedReason::NoProfile`]
/// and a warning is recorded for each.
pub fn match_profiles(
    hours_by_employee: &BTreeMap<String, Decimal>,
    profiles: &[EmployeeProfile],
    ctx: &mut RunContext,
) -> (Vec<LinkedEmployee>, Vec<UnresolvedEmployee>) {
    let mut linked = Vec::new();
    let mut unresolved = Vec::new();

    for (name, hours) in hours_by_employee {
        match profiles.iter().find(|p| names_match(name, &p.name)) {
            Some(profile) => {
                info!(
                    run_id = %ctx.run_id(),
                    timecard_name = %name,
                    profile = %profile.name,
                    "Matched employee to profile"
                );
                linked.push(LinkedEmployee {
                    timecard_name: name.clone(),
                    hours: *hours,
                    profile: profile.clone(),
                });
            }
            None => {
                ctx.warn(
                    "EMPLOYEE_NOT_CONFIGURED",
                    format!("No configured profile matches timecard employee '{}'", name),
                    Severity::High,
                );
                unresolved.push(UnresolvedEmployee {
                    name: name.clone(),
                    reason: UnresolvedReason::NoProfile,
                    hours: *hours,
                });
            }
        }
    }

    (linked, unresolved)
}
