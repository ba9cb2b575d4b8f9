use crate::error::{DreError, Result};
use crate::schema::{FinancialRecord, RecordKind, SaleStatus, SalesRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};

/// Numeric columns come back either as JSON numbers or as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Number(f64),
    Text(String),
}

impl AmountValue {
    /// Rejects unparsable text as well as `NaN` and infinities.
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            AmountValue::Number(n) if n.is_finite() => Ok(*n),
            AmountValue::Number(n) => Err(DreError::InvalidAmount(n.to_string())),
            AmountValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| DreError::InvalidAmount(s.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "type", default)]
    pub category_type: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// A transaction row as returned by the data service, category joined in.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRow {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: AmountValue,
    pub date: String,

    #[serde(default)]
    pub category: Option<CategoryRef>,

    #[serde(default)]
    pub category_id: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub responsible_id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceRow {
    pub amount: AmountValue,
    pub status: String,

    #[serde(default)]
    pub paid_date: Option<String>,

    #[serde(default)]
    pub issue_date: Option<String>,

    #[serde(default)]
    pub number: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub responsible_id: Option<String>,
}

/// Accepts `YYYY-MM-DD` (taken as midnight), RFC 3339, or a bare
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp.
pub fn parse_instant(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(crate::utils::start_of_day(date));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    Err(DreError::DateError(format!(
        "Invalid date '{}'. Expected YYYY-MM-DD or an ISO 8601 timestamp",
        value
    )))
}

fn parse_kind(kind: &str) -> Option<RecordKind> {
    match kind {
        "income" => Some(RecordKind::Income),
        "expense" => Some(RecordKind::Expense),
        _ => None,
    }
}

fn parse_sale_status(status: &str) -> Option<SaleStatus> {
    match status {
        "draft" => Some(SaleStatus::Draft),
        "pending" => Some(SaleStatus::Pending),
        "paid" => Some(SaleStatus::Paid),
        "overdue" => Some(SaleStatus::Overdue),
        "cancelled" | "canceled" => Some(SaleStatus::Cancelled),
        _ => None,
    }
}

/// Converts transaction rows into typed records. Rows with an unknown `type`
/// are skipped; bad dates or amounts fail the whole conversion.
pub fn convert_transaction_rows(rows: &[TransactionRow]) -> Result<Vec<FinancialRecord>> {
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(kind) = parse_kind(&row.kind) else {
            warn!("Skipping transaction with unknown type '{}'", row.kind);
            continue;
        };

        let category_type = row
            .category
            .as_ref()
            .and_then(|c| c.category_type.clone())
            .unwrap_or_default();

        records.push(FinancialRecord {
            amount: row.amount.to_f64()?,
            date: parse_instant(&row.date)?,
            kind,
            category_type,
            category_id: row.category_id.clone(),
            project_id: row.project_id.clone(),
            responsible_id: row.responsible_id.clone(),
            description: row.description.clone(),
        });
    }

    Ok(records)
}

/// Converts invoice rows into sales records dated by payment (falling back to
/// issue date). Rows with an unknown status are skipped.
pub fn convert_invoice_rows(rows: &[InvoiceRow]) -> Result<Vec<SalesRecord>> {
    let mut sales = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(status) = parse_sale_status(&row.status) else {
            warn!("Skipping invoice with unknown status '{}'", row.status);
            continue;
        };

        let date = row
            .paid_date
            .as_deref()
            .or(row.issue_date.as_deref())
            .ok_or_else(|| {
                DreError::DateError(format!(
                    "Invoice {} has neither paid_date nor issue_date",
                    row.number.as_deref().unwrap_or("<unnumbered>")
                ))
            })?;

        sales.push(SalesRecord {
            amount: row.amount.to_f64()?,
            date: parse_instant(date)?,
            status,
            project_id: row.project_id.clone(),
            responsible_id: row.responsible_id.clone(),
            reference: row.number.clone(),
        });
    }

    Ok(sales)
}

pub fn records_from_json(json: &str) -> Result<Vec<FinancialRecord>> {
    let rows: Vec<TransactionRow> = serde_json::from_str(json)?;
    convert_transaction_rows(&rows)
}

pub fn sales_from_json(json: &str) -> Result<Vec<SalesRecord>> {
    let rows: Vec<InvoiceRow> = serde_json::from_str(json)?;
    convert_invoice_rows(&rows)
}
