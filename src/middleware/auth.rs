use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-relworx-signature";

/// Shared-secret gate for the payment routes: the frontend sends the key in
/// `x-api-key`. An unset server-side key is a deployment mistake and answers
/// 401; a missing or wrong header answers 403.
pub async fn require_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let Some(server_key) = state.config.backend_api_key.as_deref() else {
        return AppError::MissingSecret("Backend API Key").into_response();
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided != Some(server_key) {
        return AppError::InvalidApiKey.into_response();
    }

    next.run(request).await
}

/// Check the hex-encoded HMAC-SHA256 of the raw webhook body against the
/// shared webhook secret.
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(signature) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };

    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}
