//! MinIO/S3-compatible storage client
//!
//! Uses rust-s3 for object operations. Uploaded documents live under the
//! public prefix, which is opened for anonymous reads at startup so that
//! `public_url` links work without presigning.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use tracing::{debug, info, warn};

use super::sigv4::{CanonicalRequest, SigV4Signer};
use super::ObjectStorage;
use crate::core::config::MinIOConfig;
use crate::core::error::{AppError, Result};

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    signer: SigV4Signer,
    http_client: Client,
}

impl MinIOClient {
    /// Connect to the bucket, creating it and its public-read policy if needed
    pub async fn new(config: MinIOConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let client = Self {
            bucket,
            region,
            credentials,
            signer: SigV4Signer::s3(&config.access_key, &config.secret_key, &config.region),
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
            http_client,
        };

        client.ensure_bucket_exists().await?;
        client.open_public_prefix().await;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, public_prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.public_prefix
        );

        Ok(client)
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// Create the bucket; an existing bucket is not an error
    async fn ensure_bucket_exists(&self) -> Result<()> {
        let name = self.bucket.name();
        let created = Bucket::create_with_path_style(
            &name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        let failure = match created {
            Ok(response) if response.success() => {
                info!("Bucket '{}' created successfully", name);
                return Ok(());
            }
            Ok(response) => format!("{}: {}", response.response_code, response.response_text),
            Err(e) => e.to_string(),
        };

        if bucket_already_exists(&failure) {
            debug!("Bucket '{}' already exists", name);
            return Ok(());
        }

        Err(AppError::Storage(format!(
            "Could not create bucket '{}': {}",
            name, failure
        )))
    }

    /// Allow anonymous `GetObject` on `{bucket}/{public_prefix}/*`.
    /// A failure is logged and startup continues.
    async fn open_public_prefix(&self) {
        let bucket_name = self.bucket.name();
        let policy = public_read_policy(&bucket_name, &self.public_prefix);

        match self.put_bucket_policy(&bucket_name, &policy).await {
            Ok(()) => info!(
                "Set public read policy for {}/{}/*",
                bucket_name, self.public_prefix
            ),
            Err(e) => warn!(
                "Failed to set bucket policy for '{}': {}. \
                 Set it manually with: mc anonymous set download minio/{}/{}",
                bucket_name, e, bucket_name, self.public_prefix
            ),
        }
    }

    async fn put_bucket_policy(&self, bucket_name: &str, policy: &str) -> Result<()> {
        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| AppError::Internal("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(p) => format!("{}:{}", host, p),
            None => host.to_string(),
        };

        let uri = format!("/{}", bucket_name);
        let signed = self.signer.sign(
            &CanonicalRequest {
                method: "PUT",
                host: &host_header,
                uri: &uri,
                query: "policy=",
                payload: policy.as_bytes(),
            },
            Utc::now(),
        )?;

        let response = self
            .http_client
            .put(format!("{}{}?policy", self.endpoint, uri))
            .header("Host", &host_header)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.payload_hash)
            .header("Authorization", &signed.authorization)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to send policy request: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(AppError::Storage(format!(
            "Failed to set bucket policy: {} - {}",
            status, body
        )))
    }

    fn object_key(&self, name: &str) -> String {
        format!("{}/{}", self.public_prefix, name)
    }
}

fn public_read_policy(bucket_name: &str, public_prefix: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Principal": {"AWS": "*"},
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{bucket_name}/{public_prefix}/*")]
            }
        ]
    })
    .to_string()
}

/// Build `{endpoint}/{bucket}/{key}` with each key segment percent-encoded.
/// Blank keys and keys escaping the bucket are rejected.
pub(crate) fn build_public_url(endpoint: &str, bucket: &str, key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|s| s == "..") {
        return Err(AppError::BadRequest(format!("Invalid object key '{key}'")));
    }

    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();

    Ok(format!("{}/{}/{}", endpoint, bucket, encoded.join("/")))
}

fn ensure_success(status: u16, action: &str, key: &str) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else if status == 404 {
        Err(AppError::NotFound(format!("Object '{}' not found", key)))
    } else {
        Err(AppError::Storage(format!(
            "Failed to {} '{}': HTTP {}",
            action, key, status
        )))
    }
}

#[async_trait]
impl ObjectStorage for MinIOClient {
    async fn upload(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        let key = self.object_key(name);
        let response = self
            .bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload file '{}': {}", key, e)))?;
        ensure_success(response.status_code(), "upload", &key)?;

        debug!("Uploaded file '{}' to bucket '{}'", key, self.bucket.name());
        Ok(key)
    }

    fn public_url(&self, key: &str) -> Result<String> {
        build_public_url(&self.public_endpoint, &self.bucket.name(), key)
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to download file '{}': {}", key, e)))?;
        ensure_success(response.status_code(), "download", key)?;

        debug!(
            "Downloaded file '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(response.to_vec())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete file '{}': {}", key, e)))?;
        ensure_success(response.status_code(), "delete", key)?;

        debug!(
            "Deleted file '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }
}

fn bucket_already_exists(error: &str) -> bool {
    error.contains("BucketAlreadyOwnedByYou")
        || error.contains("BucketAlreadyExists")
        || error.contains("already own it")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_public_url_encodes_segments() {
        let url = build_public_url(
            "http://localhost:9000",
            "uploads",
            "public/1712000000000_surat permohonan.pdf",
        )
        .unwrap();
        assert_eq!(
            url,
            "http://localhost:9000/uploads/public/1712000000000_surat%20permohonan.pdf"
        );
    }

    #[test]
    fn test_build_public_url_rejects_bad_keys() {
        for key in ["", "   ", "/etc/passwd", "public/../secret.pdf"] {
            assert!(
                build_public_url("http://localhost:9000", "uploads", key).is_err(),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_public_read_policy_scopes_prefix() {
        let policy: serde_json::Value =
            serde_json::from_str(&public_read_policy("uploads", "public")).unwrap();
        assert_eq!(
            policy["Statement"][0]["Resource"][0],
            "arn:aws:s3:::uploads/public/*"
        );
        assert_eq!(policy["Statement"][0]["Action"][0], "s3:GetObject");
    }

    #[test]
    fn test_ensure_success_maps_status() {
        assert!(ensure_success(200, "upload", "k").is_ok());
        assert!(matches!(
            ensure_success(404, "download", "k"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            ensure_success(500, "delete", "k"),
            Err(AppError::Storage(_))
        ));
    }

    #[test]
    fn test_bucket_already_exists() {
        let owned = "409: <Code>BucketAlreadyOwnedByYou</Code>";
        assert!(bucket_already_exists(owned));
        assert!(bucket_already_exists("BucketAlreadyExists"));
        assert!(!bucket_already_exists("403: <Code>AccessDenied</Code>"));
        assert!(!bucket_already_exists("error sending request"));
    }
}
