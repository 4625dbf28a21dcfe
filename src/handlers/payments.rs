// handlers/payments.rs
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::middleware::auth::{verify_webhook_signature, WEBHOOK_SIGNATURE_HEADER};
use crate::models::relworx::WebhookPayload;
use crate::models::transaction::{NewTransaction, TransactionPatch, TransactionStatus};
use crate::phone::normalize_msisdn;
use crate::state::AppState;

const DEFAULT_CURRENCY: &str = "UGX";
const DEFAULT_DESCRIPTION: &str = "WiFi Internet Package";
const DEFAULT_DEVICE_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct InitiatePaymentRequest {
    pub phone: Option<String>,
    pub msisdn: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub live: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceListParams {
    pub limit: Option<u32>,
}

/// `WIFI_<epoch-millis>_<8 hex chars>`. The timestamp keeps references
/// sortable; the random suffix makes same-millisecond initiations distinct.
fn generate_reference() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("WIFI_{}_{}", millis, &suffix[..8])
}

pub async fn initiate_payment(
    State(state): State<AppState>,
    Json(request): Json<InitiatePaymentRequest>,
) -> Result<Json<Value>> {
    let phone = request.phone.or(request.msisdn);

    let (Some(phone), Some(amount)) = (phone, request.amount) else {
        return Err(AppError::validation(
            "Missing required fields: phone/msisdn and amount are required",
        ));
    };
    if amount <= 0.0 {
        return Err(AppError::validation("Amount must be greater than 0"));
    }

    let formatted_phone = normalize_msisdn(&phone)?;

    let currency = request.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let description = request
        .description
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    let reference = generate_reference();

    info!(
        "Payment request: reference={} msisdn={} currency={} amount={} device_id={:?}",
        reference, formatted_phone, currency, amount, request.device_id
    );

    // Nothing is persisted unless the processor accepted the charge.
    let envelope = state
        .relworx
        .request_payment(&reference, &formatted_phone, &currency, amount, &description)
        .await?;
    let data = envelope.as_value();

    let new_transaction = NewTransaction {
        reference: reference.clone(),
        device_id: request.device_id,
        phone,
        formatted_phone,
        amount,
        currency,
        description,
        status: TransactionStatus::Pending,
        relworx_status: envelope.status.clone(),
        relworx_message: envelope.message.clone(),
        relworx_reference: envelope.internal_reference.clone(),
        relworx_response: Some(data.clone()),
    };

    // The processor already accepted the charge, so a store failure must not
    // fail the request; the response just omits transaction_id.
    let transaction_id = match state.store.insert(&new_transaction).await {
        Ok(row) => row.id,
        Err(e) => {
            warn!("Failed to persist transaction {}: {}", reference, e);
            None
        }
    };

    let mut body = json!({
        "success": true,
        "data": data,
        "reference": reference,
    });
    if let Some(id) = transaction_id {
        body["transaction_id"] = json!(id);
    }

    Ok(Json(body))
}

pub async fn check_payment_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(params): Query<StatusParams>,
) -> impl IntoResponse {
    info!("Checking payment status for reference: {}", reference);

    // A terminal stored status never regresses, so skip the processor unless
    // the caller asked for a live read.
    if params.live.is_none() {
        match state.store.find_by_reference(&reference).await {
            Ok(Some(tx)) if tx.status.is_terminal() => {
                let data = tx.relworx_response.clone().unwrap_or(Value::Null);
                return (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "status": tx.status,
                        "relworx": relworx_with_status(&data, tx.status),
                        "data": data,
                    })),
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Stored transaction lookup failed for {}: {}", reference, e),
        }
    }

    match state.relworx.check_request_status(&reference).await {
        Ok(envelope) => {
            let status =
                TransactionStatus::from_provider(envelope.status.as_deref().unwrap_or("pending"));
            let data = envelope.as_value();

            let patch = TransactionPatch::from_status(status, Some(&envelope));
            if let Err(e) = state.store.update_by_reference(&reference, &patch).await {
                warn!("Failed to update transaction {}: {}", reference, e);
            }

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "status": status,
                    "relworx": relworx_with_status(&data, status),
                    "data": data,
                })),
            )
        }
        Err(e) => {
            error!("Status check error for {}: {}", reference, e);

            // Best effort; the client is getting a 500 either way.
            let patch = TransactionPatch::from_status(TransactionStatus::Failed, None);
            if let Err(store_err) = state.store.update_by_reference(&reference, &patch).await {
                warn!("Failed to mark transaction {} failed: {}", reference, store_err);
            }

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": e.to_string(),
                    "status": "failed",
                })),
            )
        }
    }
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<Value>> {
    let transaction = state
        .store
        .find_by_reference(&reference)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    Ok(Json(json!({
        "success": true,
        "transaction": transaction,
    })))
}

pub async fn get_device_transactions(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Query(params): Query<DeviceListParams>,
) -> Result<Json<Value>> {
    let limit = params.limit.unwrap_or(DEFAULT_DEVICE_PAGE_SIZE);
    let transactions = state.store.list_by_device(&device_id, limit).await?;

    Ok(Json(json!({
        "success": true,
        "count": transactions.len(),
        "transactions": transactions,
    })))
}

/// Status push from the processor. The body is only trusted after its
/// HMAC-SHA256 signature checks out against the shared webhook secret.
pub async fn relworx_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let secret = state
        .config
        .webhook_secret
        .as_deref()
        .ok_or(AppError::MissingSecret("Webhook secret"))?;

    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::InvalidSignature)?;

    if !verify_webhook_signature(secret, &body, signature) {
        return Err(AppError::InvalidSignature);
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Invalid webhook payload: {}", e)))?;

    let status = TransactionStatus::from_provider(&payload.status);
    let mut patch = TransactionPatch::from_status(status, None);
    patch.relworx_status = Some(payload.status.clone());
    patch.relworx_reference = payload.transaction_id.clone();

    let updated = state
        .store
        .update_by_reference(&payload.reference, &patch)
        .await?;
    if updated.is_none() {
        return Err(AppError::not_found("Transaction not found"));
    }

    info!("Webhook: {} -> {}", payload.reference, status);

    Ok(Json(json!({
        "success": true,
        "reference": payload.reference,
        "status": status,
    })))
}

fn relworx_with_status(data: &Value, status: TransactionStatus) -> Value {
    let mut merged = match data {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    merged.insert("status".to_string(), json!(status));
    Value::Object(merged)
}
