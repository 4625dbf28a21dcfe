// handlers/packages.rs
use axum::extract::State;
use axum::Json;

use crate::models::package::VoucherPackage;
use crate::state::AppState;

/// The voucher catalog, in the order the frontend renders it.
pub async fn list_packages(State(state): State<AppState>) -> Json<Vec<VoucherPackage>> {
    Json(state.config.packages.clone())
}
