//! S3-compatible storage client for uploaded attachments.
//!
//! Profile photos, company logos and resumes land here. Objects are keyed
//! under `uploads/` with a random name; the returned public URL is what gets
//! persisted on the owning record.

use std::path::Path;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Configuration for the storage client.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3 API endpoint URL
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket name
    pub bucket_name: String,
    /// Region ("auto" works for most S3-compatible providers)
    pub region: String,
    /// Base URL objects are publicly served from. Defaults to
    /// `{endpoint_url}/{bucket_name}`.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let endpoint_url = std::env::var("STORAGE_ENDPOINT_URL")
            .map_err(|_| StorageError::config_error("STORAGE_ENDPOINT_URL not set"))?;
        let bucket_name = std::env::var("STORAGE_BUCKET_NAME")
            .map_err(|_| StorageError::config_error("STORAGE_BUCKET_NAME not set"))?;
        let public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint_url.trim_end_matches('/'), bucket_name));

        Ok(Self {
            access_key_id: std::env::var("STORAGE_ACCESS_KEY_ID")
                .map_err(|_| StorageError::config_error("STORAGE_ACCESS_KEY_ID not set"))?,
            secret_access_key: std::env::var("STORAGE_SECRET_ACCESS_KEY")
                .map_err(|_| StorageError::config_error("STORAGE_SECRET_ACCESS_KEY not set"))?,
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".to_string()),
            endpoint_url,
            bucket_name,
            public_base_url,
        })
    }
}

/// Object storage client.
#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl StorageClient {
    /// Create a new storage client from configuration.
    pub fn new(config: StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "jobboard",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket_name,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(StorageConfig::from_env()?))
    }

    /// Public URL an object is served from.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    /// Upload raw bytes under an explicit key.
    pub async fn upload_bytes(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        debug!("Uploading {} bytes to {}", data.len(), key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        Ok(())
    }

    /// Upload an attachment under a generated key, preserving the original
    /// file extension, and return its public URL.
    pub async fn upload_attachment(
        &self,
        filename: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let key = attachment_key(filename);
        self.upload_bytes(data, &key, content_type).await?;

        let url = self.public_url(&key);
        info!("Uploaded attachment {} to {}", filename, key);
        Ok(url)
    }

    /// Delete an object.
    pub async fn delete_object(&self, key: &str) -> StorageResult<()> {
        debug!("Deleting {}", key);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::delete_failed(e.to_string()))?;

        Ok(())
    }

    /// Check if an object exists.
    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.to_string().contains("NotFound") || e.to_string().contains("NoSuchKey") {
                    Ok(false)
                } else {
                    Err(StorageError::AwsSdk(e.to_string()))
                }
            }
        }
    }

    /// Check connectivity by performing a head bucket operation.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::AwsSdk(format!("Storage connectivity check failed: {}", e)))?;
        Ok(())
    }
}

/// Random object key under `uploads/`, keeping the original extension so
/// served files get a sensible content type.
fn attachment_key(filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    format!("uploads/{}{}", Uuid::new_v4(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_key_keeps_extension() {
        let key = attachment_key("Resume Final.PDF");
        assert!(key.starts_with("uploads/"));
        assert!(key.ends_with(".pdf"));
    }

    #[test]
    fn test_attachment_key_without_extension() {
        let key = attachment_key("resume");
        assert!(key.starts_with("uploads/"));
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_attachment_keys_are_unique() {
        assert_ne!(attachment_key("a.png"), attachment_key("a.png"));
    }
}
