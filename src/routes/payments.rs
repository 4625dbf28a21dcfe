use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::handlers::payments;
use crate::middleware::auth;
use crate::state::AppState;

/// Payment routes. Everything the frontend calls sits behind the shared
/// API key; the webhook is authenticated by its signature instead.
pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/initiate", post(payments::initiate_payment))
        .route("/status/:reference", get(payments::check_payment_status))
        .route("/transaction/:reference", get(payments::get_transaction))
        .route(
            "/device/:device_id/transactions",
            get(payments::get_device_transactions),
        )
        .route_layer(from_fn_with_state(state, auth::require_api_key));

    Router::new()
        .route("/webhook", post(payments::relworx_webhook))
        .merge(protected)
}
