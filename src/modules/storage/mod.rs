//! Storage module for supporting documents
//!
//! Provides the [`ObjectStorage`] seam used by the submission feature and its
//! MinIO/S3-compatible implementation.

mod minio_client;
mod sigv4;

pub use minio_client::MinIOClient;
#[cfg(test)]
pub(crate) use minio_client::build_public_url;

use async_trait::async_trait;

use crate::core::error::Result;

/// Object storage as seen by the application: put bytes, derive a public URL,
/// fetch bytes back, remove an object.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `name` inside the public area and return the object key
    async fn upload(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    /// Derive the public URL for a stored key. Does not check that the object exists.
    fn public_url(&self, key: &str) -> Result<String>;

    /// Read an object back
    async fn download(&self, key: &str) -> Result<Vec<u8>>;

    async fn delete(&self, key: &str) -> Result<()>;
}
