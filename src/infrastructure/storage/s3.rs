use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{error, info};

use super::{ObjectStore, StorageError, StorageResult};

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    /// `endpoint` switches to path-style addressing for S3-compatible servers
    /// such as MinIO; without it the regional AWS endpoint is used.
    pub fn new(
        region: &str,
        endpoint: Option<&str>,
        access_key: &str,
        secret_key: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials);

        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        info!(region, endpoint = endpoint.unwrap_or("aws"), "✅ S3 client configured");

        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        let start = Instant::now();
        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| StorageError::Body(e.to_string()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(
                    bucket,
                    key,
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %DisplayErrorContext(&e),
                    "S3 upload failed"
                );
                StorageError::UploadFailed {
                    key: key.to_string(),
                    reason: DisplayErrorContext(&e).to_string(),
                }
            })?;

        info!(
            bucket,
            key,
            duration_ms = start.elapsed().as_millis() as u64,
            "S3 upload successful"
        );
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> StorageResult<String> {
        let presigning_config = PresigningConfig::builder()
            .expires_in(ttl)
            .build()
            .map_err(|e| StorageError::PresignFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| StorageError::PresignFailed {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(request.uri().to_string())
    }
}
