//! Column discovery for loosely-structured tables.
//!
//! Point-of-sale exports name the same concept differently from file to file,
//! so each semantic [`Field`] carries a prioritized list of known labels. The
//! first label present in a table wins. Resolution never fails: a field that
//! cannot be found simply contributes nothing.

use rust_decimal::Decimal;

use crate::models::{Record, Table};

/// Payment-split columns summed when no single amount column exists.
pub const PAYMENT_SPLIT_COLUMNS: [&str; 6] = [
    "CCAmount",
    "CashAmount",
    "CheckAmount",
    "ACHAmount",
    "VagaroPayLaterAmount",
    "OtherAmount",
];

/// A semantic column the engine looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Sale amount of a transaction.
    Amount,
    /// Tip on a transaction.
    Tip,
    /// Discount amount.
    Discount,
    /// Service or product label.
    ServiceName,
    /// Who performed the service, by name.
    EmployeeIdentity,
    /// Transaction or discount date.
    Date,
    /// Service-provider identifier.
    ProviderId,
    /// Service-provider first name in the provider table.
    ProviderFirstName,
}

impl Field {
    /// Known labels for the field, highest priority first.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Field::Amount => &[
                "Amount",
                "Total",
                "TransactionAmount",
                "TotalAmount",
                "Price",
                "ServiceAmount",
            ],
            Field::Tip => &["Tip", "Tips", "TipAmount", "Gratuity"],
            Field::Discount => &["DiscountAmount", "Discount", "DiscountValue", "Amount"],
            Field::ServiceName => &[
                "ServiceTitle",
                "Service",
                "ServiceName",
                "Product",
                "ProductName",
                "ItemName",
                "ItemSold",
            ],
            Field::EmployeeIdentity => &[
                "ServiceProviderFirstName",
                "ServiceProviderLastName",
                "ServiceProvider",
                "EmployeeName",
                "Employee",
                "Stylist",
                "Provider",
            ],
            Field::Date => &[
                "Date",
                "TransactionDate",
                "CreatedDate",
                "InvoiceDate",
                "DiscountDate",
            ],
            Field::ProviderId => &["ServiceProviderID", "ServiceProviderId", "ProviderID"],
            Field::ProviderFirstName => &["ServiceProviderFirstName", "FirstName"],
        }
    }

    /// Label used in warnings and audit steps.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::Tip => "tip",
            Field::Discount => "discount",
            Field::ServiceName => "service name",
            Field::EmployeeIdentity => "employee identity",
            Field::Date => "date",
            Field::ProviderId => "provider id",
            Field::ProviderFirstName => "provider first name",
        }
    }
}

/// Finds the first candidate label for `field` present in `table`.
///
/// # Example
///
/// ```
/// use salon_payroll::calculation::{Field, resolve_column};
/// use salon_payroll::models::Table;
///
/// let table = Table::from_rows(
///     vec!["TipAmount".to_string(), "Tips".to_string()],
///     vec![],
/// );
/// assert_eq!(resolve_column(&table, Field::Tip), Some("Tips"));
/// assert_eq!(resolve_column(&table, Field::Amount), None);
/// ```
pub fn resolve_column(table: &Table, field: Field) -> Option<&'static str> {
    field
        .candidates()
        .iter()
        .copied()
        .find(|candidate| table.has_column(candidate))
}

/// Where a transaction's sale amount comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountColumns {
    /// One amount column.
    Single(&'static str),
    /// The sum of every present payment-split column.
    PaymentSplit(Vec<&'static str>),
    /// Nothing usable; sales are zero.
    Missing,
}

impl AmountColumns {
    /// Resolves the amount source: a single column first, then the payment
    /// split, else missing.
    pub fn resolve(table: &Table) -> Self {
        if let Some(column) = resolve_column(table, Field::Amount) {
            return AmountColumns::Single(column);
        }
        let split: Vec<&'static str> = PAYMENT_SPLIT_COLUMNS
            .iter()
            .copied()
            .filter(|column| table.has_column(column))
            .collect();
        if split.is_empty() {
            AmountColumns::Missing
        } else {
            AmountColumns::PaymentSplit(split)
        }
    }

    /// The amount of one record under this source.
    pub fn amount_of(&self, record: &Record) -> Decimal {
        match self {
            AmountColumns::Single(column) => record.decimal_or_zero(column),
            AmountColumns::PaymentSplit(columns) => columns
                .iter()
                .map(|column| record.decimal_or_zero(column))
                .sum(),
            AmountColumns::Missing => Decimal::ZERO,
        }
    }

    /// Returns true if no amount source was found.
    pub fn is_missing(&self) -> bool {
        matches!(self, AmountColumns::Missing)
    }

    /// Describes the source for audit output.
    pub fn describe(&self) -> String {
        match self {
            AmountColumns::Single(column) => (*column).to_string(),
            AmountColumns::PaymentSplit(columns) => columns.join(" + "),
            AmountColumns::Missing => "none".to_string(),
        }
    }
}

/// Every field resolved once for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    /// Sale amount source.
    pub amount: AmountColumns,
    /// Tip column.
    pub tip: Option<&'static str>,
    /// Discount column.
    pub discount: Option<&'static str>,
    /// Service label column.
    pub service_name: Option<&'static str>,
    /// Employee identity column.
    pub identity: Option<&'static str>,
    /// Date column.
    pub date: Option<&'static str>,
    /// Provider identifier column.
    pub provider_id: Option<&'static str>,
    /// Provider first-name column.
    pub provider_first_name: Option<&'static str>,
}

impl ResolvedColumns {
    /// Resolves every field against `table`.
    pub fn resolve(table: &Table) -> Self {
        Self {
            amount: AmountColumns::resolve(table),
            tip: resolve_column(table, Field::Tip),
            discount: resolve_column(table, Field::Discount),
            service_name: resolve_column(table, Field::ServiceName),
            identity: resolve_column(table, Field::EmployeeIdentity),
            date: resolve_column(table, Field::Date),
            provider_id: resolve_column(table, Field::ProviderId),
            provider_first_name: resolve_column(table, Field::ProviderFirstName),
        }
    }

    /// The resolved column for a single-column field.
    pub fn get(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Amount => match &self.amount {
                AmountColumns::Single(column) => Some(*column),
                _ => None,
            },
            Field::Tip => self.tip,
            Field::Discount => self.discount,
            Field::ServiceName => self.service_name,
            Field::EmployeeIdentity => self.identity,
            Field::Date => self.date,
            Field::ProviderId => self.provider_id,
            Field::ProviderFirstName => self.provider_first_name,
        }
    }
}

/// A table together with its resolved columns.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTable<'t> {
    /// The underlying table.
    pub table: &'t Table,
    columns: &'t ResolvedColumns,
}

impl<'t> ResolvedTable<'t> {
    /// Pairs a table with columns resolved for it.
    pub fn new(table: &'t Table, columns: &'t ResolvedColumns) -> Self {
        Self { table, columns }
    }

    /// The resolved columns.
    pub fn columns(&self) -> &'t ResolvedColumns {
        self.columns
    }

    /// All rows.
    pub fn rows(&self) -> &'t [Record] {
        self.table.rows()
    }
}
