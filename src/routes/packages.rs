use axum::{routing::get, Router};

use crate::handlers::packages;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(packages::list_packages))
}
