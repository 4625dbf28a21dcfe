pub mod relworx_service;
pub mod supabase_store;
