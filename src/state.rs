use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::relworx_service::RelworxService;
use crate::services::supabase_store::SupabaseStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub relworx: Arc<RelworxService>,
    pub store: Arc<SupabaseStore>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let relworx = Arc::new(RelworxService::new(&config));
        let store = Arc::new(SupabaseStore::new(&config));

        AppState {
            config,
            relworx,
            store,
        }
    }
}
