//! Linking employees to their records.
//!
//! An [`EmployeeLinker`] decides which rows of a table belong to an
//! employee. Both strategies share the same rule engine downstream; only the
//! record selection differs.

use std::collections::HashMap;

use tracing::info;

use crate::config::LinkingStrategy;
use crate::context::RunContext;
use crate::models::{LinkedEmployee, Record, Severity, Table};

use super::columns::{ResolvedColumns, ResolvedTable};
use super::matching::{first_token, loosely_matches};

/// Employee name to provider identifier, built once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderLinks {
    links: HashMap<String, String>,
}

impl ProviderLinks {
    /// Links each employee to the first provider row whose first name
    /// contains, or is contained in, the employee's first name.
    ///
    /// Returns `None` when the provider table lacks an identifier or a
    /// first-name column.
    pub fn build(
        employees: &[LinkedEmployee],
        providers: &Table,
        ctx: &RunContext,
    ) -> Option<Self> {
        let columns = ResolvedColumns::resolve(providers);
        let id_column = columns.provider_id?;
        let first_name_column = columns.provider_first_name?;

        let mut links = HashMap::new();
        for employee in employees {
            let Some(token) = first_token(&employee.timecard_name) else {
                continue;
            };
            // First matching row wins, even when its id is blank.
            let provider_id = providers
                .rows()
                .iter()
                .find(|row| {
                    row.text(first_name_column)
                        .is_some_and(|first_name| loosely_matches(&token, &first_name))
                })
                .and_then(|row| row.get(id_column))
                .and_then(|cell| cell.as_key());
            if let Some(provider_id) = provider_id {
                info!(
                    run_id = %ctx.run_id(),
                    employee = %employee.timecard_name,
                    provider_id = %provider_id,
                    "Linked employee to service provider"
                );
                links.insert(employee.timecard_name.clone(), provider_id);
            }
        }
        Some(Self { links })
    }

    /// The provider identifier linked to an employee.
    pub fn id_for(&self, employee: &str) -> Option<&str> {
        self.links.get(employee).map(String::as_str)
    }

    /// Number of linked employees.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if no employee was linked.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// How records are attributed to employees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeLinker {
    /// First-name containment against the table's identity column.
    NameMatch,
    /// Exact provider identifier equality.
    ProviderId(ProviderLinks),
}

impl EmployeeLinker {
    /// Chooses the linker for a run.
    ///
    /// `Auto` uses provider identifiers when a provider table with both an
    /// identifier and a first-name column is available, else names. An
    /// explicit `ProviderId` request that cannot be honoured falls back to
    /// names with a warning.
    pub fn from_strategy(
        strategy: LinkingStrategy,
        providers: Option<&Table>,
        employees: &[LinkedEmployee],
        ctx: &mut RunContext,
    ) -> Self {
        if strategy == LinkingStrategy::Name {
            return EmployeeLinker::NameMatch;
        }

        let links = providers
            .filter(|table| !table.is_empty())
            .and_then(|table| ProviderLinks::build(employees, table, ctx));

        match (strategy, links) {
            (_, Some(links)) => EmployeeLinker::ProviderId(links),
            (LinkingStrategy::ProviderId, None) => {
                ctx.warn(
                    "PROVIDER_LINKING_UNAVAILABLE",
                    "Provider table is missing or lacks id and first-name columns; linking by name",
                    Severity::Medium,
                );
                EmployeeLinker::NameMatch
            }
            _ => EmployeeLinker::NameMatch,
        }
    }

    /// Short label for logs and audit steps.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            EmployeeLinker::NameMatch => "name",
            EmployeeLinker::ProviderId(_) => "provider_id",
        }
    }

    /// Returns false only when the identifier strategy found no provider for
    /// the employee.
    pub fn is_linked(&self, employee: &str) -> bool {
        match self {
            EmployeeLinker::NameMatch => true,
            EmployeeLinker::ProviderId(links) => links.id_for(employee).is_some(),
        }
    }

    /// The rows of `table` that belong to `employee`.
    ///
    /// Under the identifier strategy a table with no identifier column is
    /// matched by name instead.
    pub fn records_for<'t>(&self, employee: &str, table: ResolvedTable<'t>) -> Vec<&'t Record> {
        match self {
            EmployeeLinker::ProviderId(links) => match table.columns().provider_id {
                Some(id_column) => {
                    let Some(provider_id) = links.id_for(employee) else {
                        return Vec::new();
                    };
                    table
                        .rows()
                        .iter()
                        .filter(|row| {
                            row.get(id_column)
                                .and_then(|cell| cell.as_key())
                                .is_some_and(|key| key == provider_id)
                        })
                        .collect()
                }
                None => records_by_name(employee, table),
            },
            EmployeeLinker::NameMatch => records_by_name(employee, table),
        }
    }
}

fn records_by_name<'t>(employee: &str, table: ResolvedTable<'t>) -> Vec<&'t Record> {
    let (Some(identity), Some(token)) = (table.columns().identity, first_token(employee)) else {
        return Vec::new();
    };
    table
        .rows()
        .iter()
        .filter(|row| {
            row.text(identity)
                .is_some_and(|value| loosely_matches(&token, &value))
        })
        .collect()
}
