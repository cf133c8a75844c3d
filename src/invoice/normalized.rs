use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{RecognitionError, Result};

/// Billing state of an invoice as reported by the billing provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    Draft,
    Open,
    Paid,
    Void,
    Uncollectible,
    /// Any state this crate does not model; kept verbatim.
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Open => "open",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Void => "void",
            InvoiceStatus::Uncollectible => "uncollectible",
            InvoiceStatus::Other(s) => s.as_str(),
        }
    }

    /// Void and uncollectible invoices never carry a deferred balance.
    pub fn is_written_off(&self) -> bool {
        matches!(self, InvoiceStatus::Void | InvoiceStatus::Uncollectible)
    }
}

impl From<String> for InvoiceStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => InvoiceStatus::Draft,
            "open" => InvoiceStatus::Open,
            "paid" => InvoiceStatus::Paid,
            "void" => InvoiceStatus::Void,
            "uncollectible" => InvoiceStatus::Uncollectible,
            _ => InvoiceStatus::Other(value),
        }
    }
}

impl From<InvoiceStatus> for String {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invoice in the provider-neutral shape the recognition engine consumes.
///
/// Amounts are in minor currency units. Dates stay as the ISO-8601 strings the
/// billing API returned; they are parsed when the engine reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInvoice {
    pub id: String,
    pub customer_id: String,
    pub total_amount: i64,
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end: Option<String>,
}

impl NormalizedInvoice {
    /// The service period bounds, only when both ends are present.
    pub fn service_period(&self) -> Option<(&str, &str)> {
        match (&self.period_start, &self.period_end) {
            (Some(start), Some(end)) => Some((start.as_str(), end.as_str())),
            _ => None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

/// Load a JSON array of invoices from disk
pub fn load_invoices(path: &Path) -> Result<Vec<NormalizedInvoice>> {
    if !path.exists() {
        return Err(RecognitionError::InvoiceFileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| RecognitionError::InvoiceParse {
        path: path.to_path_buf(),
        source: e,
    })
}
