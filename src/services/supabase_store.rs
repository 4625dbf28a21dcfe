// services/supabase_store.rs
use reqwest::{header, Client};
use std::time::Duration;
use tracing::error;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::transaction::{NewTransaction, Transaction, TransactionPatch};

const TRANSACTIONS_TABLE: &str = "wifi_transactions";

/// Transaction store backed by Supabase's PostgREST API: one row per
/// payment attempt, keyed by the gateway reference.
///
/// Write failures on the initiate and status paths are logged and swallowed
/// by callers; a charge the processor accepted still reports success to the
/// client, just without a transaction id.
#[derive(Clone)]
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    client: Client,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        SupabaseStore {
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_key.clone(),
            client,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TRANSACTIONS_TABLE)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    pub async fn insert(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let response = self
            .authorize(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(transaction)
            .send()
            .await
            .map_err(|e| AppError::store(format!("Supabase insert failed: {}", e)))?;

        let mut rows = Self::read_rows(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::store("Supabase insert returned no rows"))
    }

    /// Apply a partial update to the row with the given reference. Returns
    /// `None` when no row matched.
    pub async fn update_by_reference(
        &self,
        reference: &str,
        patch: &TransactionPatch,
    ) -> Result<Option<Transaction>> {
        let response = self
            .authorize(self.client.patch(self.table_url()))
            .query(&[("reference", format!("eq.{}", reference))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .map_err(|e| AppError::store(format!("Supabase update failed: {}", e)))?;

        let mut rows = Self::read_rows(response).await?;
        Ok(rows.pop())
    }

    pub async fn find_by_reference(&self, reference: &str) -> Result<Option<Transaction>> {
        let response = self
            .authorize(self.client.get(self.table_url()))
            .query(&[
                ("reference", format!("eq.{}", reference)),
                ("select", "*".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::store(format!("Supabase select failed: {}", e)))?;

        let mut rows = Self::read_rows(response).await?;
        Ok(rows.pop())
    }

    /// Latest transactions recorded for a device, newest first.
    pub async fn list_by_device(&self, device_id: &str, limit: u32) -> Result<Vec<Transaction>> {
        let response = self
            .authorize(self.client.get(self.table_url()))
            .query(&[
                ("device_id", format!("eq.{}", device_id)),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::store(format!("Supabase select failed: {}", e)))?;

        Self::read_rows(response).await
    }

    async fn read_rows(response: reqwest::Response) -> Result<Vec<Transaction>> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Supabase request failed: {} - {}", status, body);
            return Err(AppError::store(format!(
                "Supabase request failed with status {}",
                status
            )));
        }

        response
            .json::<Vec<Transaction>>()
            .await
            .map_err(|e| AppError::store(format!("Failed to parse Supabase response: {}", e)))
    }
}
