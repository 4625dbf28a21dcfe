// handlers/identify.rs
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct IdentifyDeviceRequest {
    #[serde(rename = "deviceId")]
    pub device_id: Option<String>,
}

/// Pure logging side effect; the frontend just wants its identifier echoed.
pub async fn identify_device(Json(request): Json<IdentifyDeviceRequest>) -> Json<Value> {
    info!("Received device ID: {:?}", request.device_id);

    Json(json!({
        "success": true,
        "deviceId": request.device_id,
    }))
}
