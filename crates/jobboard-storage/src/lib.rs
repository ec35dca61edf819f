//! Object storage for uploaded attachments (profile photos, logos, resumes).

pub mod client;
pub mod error;

pub use client::{StorageClient, StorageConfig};
pub use error::{StorageError, StorageResult};
