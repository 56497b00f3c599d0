//! S3 object store provider.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info, warn};

use blobhub_core::config::blob_store::S3Config;
use blobhub_core::error::{AppError, ErrorKind};
use blobhub_core::result::AppResult;
use blobhub_core::traits::storage::ObjectStore;

/// Error codes S3 uses to report a missing object.
const MISSING_OBJECT_CODES: [&str; 2] = ["NoSuchKey", "NotFound"];

/// Name reported for credentials taken from the configuration file.
const CONFIG_CREDENTIALS_PROVIDER: &str = "blobhub-config";

/// S3 object store bound to a single bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3 object store from configuration.
    ///
    /// Uses the configured access key pair when both halves are present and
    /// the default AWS credential chain otherwise.
    pub async fn new(config: &S3Config) -> AppResult<Self> {
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| AppError::configuration("S3 bucket is not configured"))?;
        let region = config
            .region
            .clone()
            .ok_or_else(|| AppError::configuration("S3 region is not configured"))?;

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.clone()));
        if let Some((access_key_id, secret_key)) = config.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_key,
                None,
                None,
                CONFIG_CREDENTIALS_PROVIDER,
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!(
            bucket = %bucket,
            region = %region,
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            "Initializing S3 object store"
        );

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket,
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(
                    bucket = %self.bucket,
                    error = %DisplayErrorContext(&e),
                    "S3 bucket is not reachable"
                );
                Ok(false)
            }
        }
    }

    async fn write(
        &self,
        key: &str,
        data: Bytes,
        content_length: u64,
        content_type: &str,
    ) -> AppResult<()> {
        let content_length = i64::try_from(content_length).map_err(|_| {
            AppError::storage(format!("Object too large for S3: {content_length} bytes"))
        })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_length(content_length)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("S3 put_object failed for '{key}': {}", DisplayErrorContext(&e)),
                    e,
                )
            })?;

        debug!(key, bytes = content_length, "Wrote S3 object");
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<Bytes> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if is_missing_object(&e) => {
                return Err(AppError::not_found(format!("Object not found: {key}")));
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("S3 get_object failed for '{key}': {}", DisplayErrorContext(&e)),
                    e,
                ));
            }
        };

        let body = output.body.collect().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read S3 object body for '{key}'"),
                e,
            )
        })?;

        let data = body.into_bytes();
        debug!(key, bytes = data.len(), "Read S3 object");
        Ok(data)
    }
}

/// Whether a `get_object` failure means the object does not exist.
fn is_missing_object(err: &SdkError<GetObjectError, HttpResponse>) -> bool {
    if let Some(service) = err.as_service_error() {
        if service.is_no_such_key() {
            return true;
        }
    }
    let status = err.raw_response().map(|r| r.status().as_u16());
    is_missing_object_signal(err.code(), status)
}

/// Classify an error code / HTTP status pair.
///
/// `NoSuchKey` comes back from GET requests; `NotFound` (with no body and a
/// bare 404) from HEAD-style requests. A 404 carrying some other code, such
/// as `NoSuchBucket`, is a configuration problem and not a missing blob.
fn is_missing_object_signal(code: Option<&str>, status: Option<u16>) -> bool {
    match code {
        Some(code) => MISSING_OBJECT_CODES.contains(&code),
        None => status == Some(404),
    }
}
