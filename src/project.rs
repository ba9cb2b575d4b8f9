//! Per-project financial summary produced by the data service's aggregation
//! procedure. Only the observed output fields are modelled; the procedure's
//! formulas are not reproduced here.

use crate::error::Result;
use crate::ingestion::AmountValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFinancialSummary {
    #[serde(default, alias = "projeto_id")]
    pub project_id: Option<String>,

    #[serde(rename = "margem_liquida", default)]
    pub net_margin: Option<AmountValue>,

    #[serde(rename = "margem_percentual", default)]
    pub margin_pct: Option<AmountValue>,

    #[serde(rename = "percentual_orcamento_usado", default)]
    pub budget_used_pct: Option<AmountValue>,

    /// Any other field the procedure returns, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProjectFinancialSummary {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The procedure may return a single object or a one-row array.
    pub fn from_rpc_response(json: &str) -> Result<Vec<Self>> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        match value {
            serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
            other => Ok(vec![serde_json::from_value(other)?]),
        }
    }

    pub fn net_margin(&self) -> Result<Option<f64>> {
        self.net_margin.as_ref().map(AmountValue::to_f64).transpose()
    }

    pub fn margin_pct(&self) -> Result<Option<f64>> {
        self.margin_pct.as_ref().map(AmountValue::to_f64).transpose()
    }

    pub fn budget_used_pct(&self) -> Result<Option<f64>> {
        self.budget_used_pct
            .as_ref()
            .map(AmountValue::to_f64)
            .transpose()
    }

    /// Numeric value of an unmodelled field, if present and numeric.
    pub fn extra_number(&self, key: &str) -> Option<f64> {
        match self.extra.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
