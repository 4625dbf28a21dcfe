// config.rs
use std::env;

use crate::models::package::VoucherPackage;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub relworx_api_key: String,
    pub relworx_account_no: String,
    pub relworx_base_url: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub backend_api_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub allowed_origins: Vec<String>,
    pub packages: Vec<VoucherPackage>,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            relworx_api_key: env::var("RELWORX_API_KEY")
                .expect("RELWORX_API_KEY must be set"),
            relworx_account_no: env::var("RELWORX_ACCOUNT_NO")
                .expect("RELWORX_ACCOUNT_NO must be set"),
            relworx_base_url: env::var("RELWORX_BASE_URL")
                .expect("RELWORX_BASE_URL must be set"),
            supabase_url: env::var("SUPABASE_URL")
                .expect("SUPABASE_URL must be set"),
            supabase_key: env::var("SUPABASE_KEY")
                .expect("SUPABASE_KEY must be set"),
            // Left optional on purpose: the access gate answers 401 when the
            // server-side key is missing instead of refusing to boot.
            backend_api_key: env::var("BACKEND_API_KEY").ok(),
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            packages: load_packages(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}

// The voucher catalog changed between deployments, so it is configuration,
// not code: WIFI_PACKAGES_JSON overrides the built-in tier list.
fn load_packages() -> Vec<VoucherPackage> {
    match env::var("WIFI_PACKAGES_JSON") {
        Ok(raw) => serde_json::from_str(&raw)
            .expect("WIFI_PACKAGES_JSON must be a valid JSON array of packages"),
        Err(_) => VoucherPackage::default_catalog(),
    }
}
