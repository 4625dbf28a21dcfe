use std::sync::Arc;

use wifi_pay_api::app;
use wifi_pay_api::config::AppConfig;
use wifi_pay_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Arc::new(AppConfig::from_env());
    let state = AppState::new(config.clone());

    let router = app::build_router(state);
    app::start_server(router, &config).await
}
