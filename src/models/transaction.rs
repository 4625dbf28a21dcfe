// models/transaction.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::relworx::RelworxResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    /// Map whatever status string the processor reports onto the stored
    /// lifecycle. Unknown values stay `pending`.
    pub fn from_provider(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "confirmed" => TransactionStatus::Confirmed,
            "failed" => TransactionStatus::Failed,
            _ => TransactionStatus::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionStatus::Confirmed | TransactionStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row per payment attempt in the `wifi_transactions` table.
///
/// The `relworx_*` columns mirror the last processor response verbatim and
/// exist as an audit trail; business logic only reads `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<Uuid>,

    pub reference: String,
    #[serde(default)]
    pub device_id: Option<String>,

    pub phone: String,
    pub formatted_phone: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,

    pub status: TransactionStatus,

    // Processor mirror
    #[serde(default)]
    pub relworx_status: Option<String>,
    #[serde(default)]
    pub relworx_message: Option<String>,
    #[serde(default)]
    pub relworx_reference: Option<String>,
    #[serde(default)]
    pub relworx_response: Option<Value>,

    // Timestamps
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failed_at: Option<DateTime<Utc>>,
}

/// Insert payload. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub reference: String,
    pub device_id: Option<String>,
    pub phone: String,
    pub formatted_phone: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub status: TransactionStatus,
    pub relworx_status: Option<String>,
    pub relworx_message: Option<String>,
    pub relworx_reference: Option<String>,
    pub relworx_response: Option<Value>,
}

/// Partial update applied to a stored row; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relworx_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relworx_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relworx_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relworx_response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
}

impl TransactionPatch {
    /// Mirror a processor-reported status into the stored row, stamping the
    /// terminal timestamp when one applies.
    pub fn from_status(status: TransactionStatus, envelope: Option<&RelworxResponse>) -> Self {
        let now = Utc::now();

        TransactionPatch {
            status: Some(status),
            relworx_status: envelope.and_then(|e| e.status.clone()),
            relworx_message: envelope.and_then(|e| e.message.clone()),
            relworx_reference: envelope.and_then(|e| e.internal_reference.clone()),
            relworx_response: envelope.map(|e| e.as_value()),
            updated_at: Some(now),
            confirmed_at: (status == TransactionStatus::Confirmed).then_some(now),
            failed_at: (status == TransactionStatus::Failed).then_some(now),
        }
    }
}
