pub mod analytics_service;
pub mod dataset_cache;
pub mod derivation;
pub mod ingest_service;
pub mod record_filter;
pub mod session_service;
pub mod settings_service;
