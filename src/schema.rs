use crate::error::{DreError, Result};
use chrono::{NaiveDateTime, Weekday};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[schemars(description = "Money coming in (service revenue, other revenue)")]
    Income,

    #[schemars(description = "Money going out (taxes, refunds, costs, expenses)")]
    Expense,
}

/// A generic income/expense transaction as stored by the backend, with the
/// `type` tag of its category already joined in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FinancialRecord {
    #[schemars(description = "Transaction amount. Accumulated as an absolute magnitude.")]
    pub amount: f64,

    #[schemars(description = "When the transaction happened (local wall-clock time)")]
    pub date: NaiveDateTime,

    pub kind: RecordKind,

    #[schemars(
        description = "The category type tag (e.g. 'service', 'tax', 'refund', 'material', 'operational', 'salary', 'rent', 'marketing', 'financial')"
    )]
    pub category_type: String,

    #[serde(default)]
    pub category_id: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub responsible_id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl FinancialRecord {
    pub fn new(
        kind: RecordKind,
        category_type: impl Into<String>,
        amount: f64,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            amount,
            date,
            kind,
            category_type: category_type.into(),
            category_id: None,
            project_id: None,
            responsible_id: None,
            description: None,
        }
    }

    pub fn income(category_type: impl Into<String>, amount: f64, date: NaiveDateTime) -> Self {
        Self::new(RecordKind::Income, category_type, amount, date)
    }

    pub fn expense(category_type: impl Into<String>, amount: f64, date: NaiveDateTime) -> Self {
        Self::new(RecordKind::Expense, category_type, amount, date)
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_responsible(mut self, responsible_id: impl Into<String>) -> Self {
        self.responsible_id = Some(responsible_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Draft,
    Pending,
    #[schemars(description = "Settled. Only paid sales count towards gross sales.")]
    Paid,
    Overdue,
    Cancelled,
}

/// An invoice-like sales record. This stream is separate from the
/// income/expense transactions and feeds gross sales only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct SalesRecord {
    pub amount: f64,

    #[schemars(description = "Settlement date of the sale")]
    pub date: NaiveDateTime,

    pub status: SaleStatus,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub responsible_id: Option<String>,

    #[serde(default)]
    pub reference: Option<String>,
}

impl SalesRecord {
    pub fn paid(amount: f64, date: NaiveDateTime) -> Self {
        Self {
            amount,
            date,
            status: SaleStatus::Paid,
            project_id: None,
            responsible_id: None,
            reference: None,
        }
    }

    pub fn with_status(mut self, status: SaleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_responsible(mut self, responsible_id: impl Into<String>) -> Self {
        self.responsible_id = Some(responsible_id.into());
        self
    }
}

/// Both record streams for one window, as returned by a single fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct RecordSet {
    #[serde(default)]
    pub sales: Vec<SalesRecord>,

    #[serde(default)]
    pub transactions: Vec<FinancialRecord>,
}

impl RecordSet {
    pub fn new(sales: Vec<SalesRecord>, transactions: Vec<FinancialRecord>) -> Self {
        Self {
            sales,
            transactions,
        }
    }

    pub fn len(&self) -> usize {
        self.sales.len() + self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.transactions.is_empty()
    }

    /// Keeps only the records accepted by `filters`. Window bounds are not
    /// applied here; the aggregator owns date filtering.
    pub fn filtered(&self, filters: &ReportFilters) -> RecordSet {
        RecordSet {
            sales: self
                .sales
                .iter()
                .filter(|s| filters.accepts_sale(s))
                .cloned()
                .collect(),
            transactions: self
                .transactions
                .iter()
                .filter(|t| filters.accepts_transaction(t))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    #[schemars(description = "Uses custom_range; falls back to month when the range is incomplete")]
    Custom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
pub struct CustomRange {
    #[serde(default)]
    pub from: Option<NaiveDateTime>,

    #[serde(default)]
    pub to: Option<NaiveDateTime>,
}

impl CustomRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Ordered `(start, end)` bounds, or `None` if either side is missing.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from <= to => Some((from, to)),
            (Some(from), Some(to)) => Some((to, from)),
            _ => None,
        }
    }
}

/// The filter selection driving one report computation. Owned by the caller
/// and passed in on every recomputation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ReportFilters {
    #[serde(default)]
    pub period: PeriodKind,

    #[serde(default)]
    pub custom_range: Option<CustomRange>,

    #[serde(default)]
    #[schemars(description = "Restrict transactions to a single category id")]
    pub category_id: Option<String>,

    #[serde(default)]
    #[schemars(description = "Restrict both sales and transactions to a single project")]
    pub project_id: Option<String>,

    #[serde(default)]
    #[schemars(description = "Restrict both sales and transactions to a single responsible person")]
    pub responsible_id: Option<String>,
}

impl ReportFilters {
    pub fn for_period(period: PeriodKind) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    pub fn custom(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            period: PeriodKind::Custom,
            custom_range: Some(CustomRange::new(from, to)),
            ..Self::default()
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_responsible(mut self, responsible_id: impl Into<String>) -> Self {
        self.responsible_id = Some(responsible_id.into());
        self
    }

    pub fn accepts_transaction(&self, record: &FinancialRecord) -> bool {
        matches_filter(&self.project_id, &record.project_id)
            && matches_filter(&self.responsible_id, &record.responsible_id)
            && matches_filter(&self.category_id, &record.category_id)
    }

    pub fn accepts_sale(&self, record: &SalesRecord) -> bool {
        matches_filter(&self.project_id, &record.project_id)
            && matches_filter(&self.responsible_id, &record.responsible_id)
    }
}

fn matches_filter(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        Some(id) => actual.as_deref() == Some(id.as_str()),
        None => true,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum FirstDayOfWeek {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl FirstDayOfWeek {
    pub fn to_weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Tuesday => Weekday::Tue,
            Self::Wednesday => Weekday::Wed,
            Self::Thursday => Weekday::Thu,
            Self::Friday => Weekday::Fri,
            Self::Saturday => Weekday::Sat,
            Self::Sunday => Weekday::Sun,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportConfig {
    #[schemars(description = "Name shown in report headers and exports")]
    pub organization_name: String,

    #[serde(default)]
    #[schemars(description = "First day of the week for 'week' periods. Defaults to Monday.")]
    pub first_day_of_week: FirstDayOfWeek,

    #[serde(default)]
    #[schemars(description = "Filters used when the caller does not supply any")]
    pub default_filters: ReportFilters,
}

impl ReportConfig {
    pub fn new(organization_name: impl Into<String>) -> Self {
        Self {
            organization_name: organization_name.into(),
            first_day_of_week: FirstDayOfWeek::default(),
            default_filters: ReportFilters::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.organization_name.trim().is_empty() {
            return Err(DreError::ValidationError {
                field: "organization_name".to_string(),
                details: "must not be empty".to_string(),
            });
        }

        if self.default_filters.period == PeriodKind::Custom {
            if let Some(CustomRange {
                from: Some(from),
                to: Some(to),
            }) = self.default_filters.custom_range
            {
                if from > to {
                    return Err(DreError::ValidationError {
                        field: "default_filters.custom_range".to_string(),
                        details: format!("from ({}) is after to ({})", from, to),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ReportConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
