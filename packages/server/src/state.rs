use std::sync::Arc;

use common::storage::DocumentStore;
use dashmap::DashMap;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::policy::AccessPolicy;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub docs: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
    pub access: Arc<AccessPolicy>,
    /// Token ids revoked by logout, mapped to their expiry timestamp.
    pub revoked_tokens: Arc<DashMap<String, usize>>,
}
