//! MongoDB client wrapper.
//!
//! Owns the pooled driver client and the index bootstrap. Uniqueness
//! constraints (user email, company name, one application per job per
//! applicant) are enforced here as unique indexes; application-level
//! existence checks are only a fast path for friendlier error messages.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Collection names.
pub mod collections {
    pub const USERS: &str = "users";
    pub const COMPANIES: &str = "companies";
    pub const JOBS: &str = "jobs";
    pub const APPLICATIONS: &str = "applications";
}

/// MongoDB client configuration.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string
    pub uri: String,
    /// Database name
    pub database: String,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl MongoConfig {
    /// Create config from environment variables.
    pub fn from_env() -> DbResult<Self> {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        if uri.is_empty() {
            return Err(DbError::config("MONGODB_URI cannot be empty"));
        }

        let connect_timeout_secs: u64 = std::env::var("MONGODB_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            uri,
            database: std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "jobboard".to_string()),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

/// Handle to the job-board database.
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db: Database,
}

impl MongoClient {
    /// Connect and verify the connection with a ping.
    pub async fn new(config: MongoConfig) -> DbResult<Self> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;
        options.app_name = Some(concat!("jobboard/", env!("CARGO_PKG_VERSION")).to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client = Client::with_options(options)?;
        let db = client.database(&config.database);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        info!("Connected to MongoDB database '{}'", config.database);

        Ok(Self { client, db })
    }

    /// Create from environment variables.
    pub async fn from_env() -> DbResult<Self> {
        let config = MongoConfig::from_env()?;
        Self::new(config).await
    }

    /// Typed collection handle.
    pub fn collection<T: Send + Sync + Serialize + for<'de> Deserialize<'de>>(
        &self,
        name: &str,
    ) -> Collection<T> {
        self.db.collection(name)
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The underlying driver client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Connectivity probe for readiness checks.
    pub async fn ping(&self) -> DbResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Create the indexes the data model relies on. Idempotent; run at
    /// startup before serving traffic.
    pub async fn ensure_indexes(&self) -> DbResult<()> {
        debug!("Ensuring indexes");

        let unique = IndexOptions::builder().unique(true).build();

        let users = self.db.collection::<mongodb::bson::Document>(collections::USERS);
        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await?;
        users
            .create_index(IndexModel::builder().keys(doc! { "role": 1 }).build())
            .await?;

        let companies = self.db.collection::<mongodb::bson::Document>(collections::COMPANIES);
        companies
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "name": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await?;
        companies
            .create_index(IndexModel::builder().keys(doc! { "userId": 1 }).build())
            .await?;

        let jobs = self.db.collection::<mongodb::bson::Document>(collections::JOBS);
        for keys in [
            doc! { "company": 1 },
            doc! { "created_by": 1 },
            doc! { "jobType": 1 },
            doc! { "location": 1 },
        ] {
            jobs.create_index(IndexModel::builder().keys(keys).build()).await?;
        }

        let applications = self
            .db
            .collection::<mongodb::bson::Document>(collections::APPLICATIONS);
        // One application per (job, applicant); the real guard under races.
        applications
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "job": 1, "applicant": 1 })
                    .options(unique)
                    .build(),
            )
            .await?;
        for keys in [doc! { "applicant": 1 }, doc! { "job": 1 }, doc! { "status": 1 }] {
            applications
                .create_index(IndexModel::builder().keys(keys).build())
                .await?;
        }

        info!("Indexes ready");
        Ok(())
    }
}
