// services/relworx_service.rs
use reqwest::{header, Client};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::relworx::RelworxResponse;

const RELWORX_ACCEPT: &str = "application/vnd.relworx.v2";

#[derive(Debug, Serialize)]
struct RequestPaymentBody<'a> {
    account_no: &'a str,
    reference: &'a str,
    msisdn: &'a str,
    currency: &'a str,
    amount: f64,
    description: &'a str,
}

/// Stateless client for the Relworx mobile-money API. Both calls are
/// single-shot pass-throughs: no retries, no caching.
#[derive(Clone)]
pub struct RelworxService {
    api_key: String,
    account_no: String,
    base_url: String,
    client: Client,
}

impl RelworxService {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        RelworxService {
            api_key: config.relworx_api_key.clone(),
            account_no: config.relworx_account_no.clone(),
            base_url: config.relworx_base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Ask the processor to charge `msisdn` via mobile money.
    pub async fn request_payment(
        &self,
        reference: &str,
        msisdn: &str,
        currency: &str,
        amount: f64,
        description: &str,
    ) -> Result<RelworxResponse> {
        info!("Requesting payment: {} {} {} for {}", reference, currency, amount, msisdn);

        let body = RequestPaymentBody {
            account_no: &self.account_no,
            reference,
            msisdn,
            currency,
            amount,
            description,
        };

        let response = self
            .client
            .post(format!("{}/mobile-money/request-payment", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::ACCEPT, RELWORX_ACCEPT)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Relworx {
                message: e.to_string(),
                details: None,
            })?;

        Self::read_response(response).await
    }

    /// Query the processor for the current state of an earlier charge.
    pub async fn check_request_status(&self, reference: &str) -> Result<RelworxResponse> {
        let response = self
            .client
            .get(format!("{}/mobile-money/check-request-status", self.base_url))
            .query(&[
                ("internal_reference", reference),
                ("account_no", self.account_no.as_str()),
            ])
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::ACCEPT, RELWORX_ACCEPT)
            .send()
            .await
            .map_err(|e| AppError::Relworx {
                message: e.to_string(),
                details: None,
            })?;

        Self::read_response(response).await
    }

    async fn read_response(response: reqwest::Response) -> Result<RelworxResponse> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Relworx request failed: {} - {}", status, body);

            let details = match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(value) => Some(value),
                Err(_) if body.is_empty() => None,
                Err(_) => Some(serde_json::Value::String(body)),
            };

            return Err(AppError::Relworx {
                message: format!("Relworx request failed with status {}", status),
                details,
            });
        }

        response
            .json::<RelworxResponse>()
            .await
            .map_err(|e| AppError::Relworx {
                message: format!("Failed to parse Relworx response: {}", e),
                details: None,
            })
    }
}
