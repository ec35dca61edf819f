//! Application state.

use std::sync::Arc;

use jobboard_mongo::MongoClient;
use jobboard_storage::StorageClient;

use crate::config::ApiConfig;

/// Shared application state: the config plus handles to the document store
/// and object storage. Repositories are constructed per request from the
/// pooled client; there is no other shared mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub db: Arc<MongoClient>,
    pub storage: Arc<StorageClient>,
}

impl AppState {
    /// Create new application state. Connects to MongoDB, bootstraps the
    /// unique indexes, and configures object storage. Any failure here is
    /// fatal at startup.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if config.jwt_secret.is_empty() {
            return Err("SECRET_KEY must be set to sign session tokens".into());
        }

        let db = MongoClient::from_env().await?;
        db.ensure_indexes().await?;

        let storage = StorageClient::from_env()?;

        Ok(Self {
            config,
            db: Arc::new(db),
            storage: Arc::new(storage),
        })
    }
}
