use axum::{routing::post, Router};

use crate::handlers::identify;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/identify-device", post(identify::identify_device))
}
