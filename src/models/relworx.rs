// models/relworx.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Everything the processor sends back, with named fields for what the
/// gateway acts on. Unknown fields ride along in `extra` so the stored
/// mirror and the `data` field of responses keep the full payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelworxResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_reference: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RelworxResponse {
    pub fn as_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Status notification pushed by the processor.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub reference: String,
    pub status: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
}
