//! File store: where finished reports are published.
//!
//! `FileStore` is the seam; `S3FileStore` is the production backend
//! (S3 / MinIO). `AppState` holds an `Arc<dyn FileStore>`.

pub mod publisher;

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

pub use publisher::publish_report;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("upload of '{name}' failed: {message}")]
    Upload { name: String, message: String },

    #[error("public read grant on '{object_id}' failed: {message}")]
    Grant { object_id: String, message: String },

    #[error("could not read report file: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores `bytes` as `name` under `folder`. Returns the object id.
    async fn upload(&self, name: &str, bytes: Vec<u8>, folder: &str)
        -> Result<String, StoreError>;

    /// Makes the object readable by anyone holding the link.
    async fn grant_public_read(&self, object_id: &str) -> Result<(), StoreError>;

    /// Public link for an object id. Pure string formatting.
    fn share_link(&self, object_id: &str) -> String;
}

/// S3-compatible store. Object ids are object keys within `bucket`.
#[derive(Clone)]
pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        folder: &str,
    ) -> Result<String, StoreError> {
        let key = object_key(folder, name);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/pdf")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StoreError::Upload {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        info!("Uploaded report to s3://{}/{}", self.bucket, key);
        Ok(key)
    }

    async fn grant_public_read(&self, object_id: &str) -> Result<(), StoreError> {
        self.client
            .put_object_acl()
            .bucket(&self.bucket)
            .key(object_id)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StoreError::Grant {
                object_id: object_id.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn share_link(&self, object_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.bucket,
            object_id
        )
    }
}

/// Constructs an S3 client for MinIO (local) or AWS (production).
/// Every operation is bounded by `HTTP_TIMEOUT_SECS`, retries included.
pub async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "kol-api-static",
    );

    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(config.http_timeout_secs))
                .build(),
        )
        .load()
        .await;

    // MinIO and most self-hosted stores only serve path-style URLs.
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

fn object_key(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

    fn offline_store(public_base_url: &str) -> S3FileStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("k", "s", None, None, "test"))
            .build();
        S3FileStore::new(
            aws_sdk_s3::Client::from_conf(config),
            "reports".to_string(),
            public_base_url.to_string(),
        )
    }

    #[tokio::test]
    async fn test_s3_client_bounds_each_operation() {
        let mut config = crate::config::test_config();
        config.http_timeout_secs = 7;
        let client = build_s3_client(&config).await;
        let timeouts = client.config().timeout_config().expect("timeout config");
        assert_eq!(timeouts.operation_timeout(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_object_key_joins_folder() {
        assert_eq!(object_key("kol-reports", "a.pdf"), "kol-reports/a.pdf");
        assert_eq!(object_key("/kol-reports/", "a.pdf"), "kol-reports/a.pdf");
        assert_eq!(object_key("", "a.pdf"), "a.pdf");
    }

    #[test]
    fn test_share_link_template() {
        let store = offline_store("https://files.example.com/");
        assert_eq!(
            store.share_link("kol-reports/a.pdf"),
            "https://files.example.com/reports/kol-reports/a.pdf"
        );
    }
}
