//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s3b-core.

use async_trait::async_trait;
use aws_credential_types::provider::ProvideCredentials as _;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};

use s3b_core::{DeleteResult, Error, ListOptions, ListResult, ObjectInfo, ObjectStore, Result};

/// Region used when neither the profile nor the caller provides one
pub const DEFAULT_REGION: &str = "us-east-1";

/// How to build the client
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Named credentials profile; the default chain when `None`
    pub profile: Option<String>,

    /// Custom endpoint URL for S3-compatible services
    pub endpoint: Option<String>,

    /// Region override
    pub region: Option<String>,

    /// Use path-style bucket addressing
    pub path_style: bool,
}

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    profile: String,
    access_key_id: String,
}

impl std::fmt::Debug for S3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Client")
            .field("profile", &self.profile)
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

impl S3Client {
    /// Create a new S3 client, failing early if no credentials resolve
    pub async fn new(options: ConnectOptions) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &options.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &options.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        let provider = config
            .credentials_provider()
            .ok_or_else(|| Error::Auth("no credentials provider configured".into()))?;
        let credentials = provider
            .provide_credentials()
            .await
            .map_err(|e| Error::Auth(DisplayErrorContext(&e).to_string()))?;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&config).force_path_style(options.path_style);
        if config.region().is_none() {
            tracing::debug!("no region configured, using {DEFAULT_REGION}");
            builder = builder.region(aws_config::Region::new(DEFAULT_REGION));
        }

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(builder.build()),
            profile: options.profile.unwrap_or_else(|| "default".to_string()),
            access_key_id: credentials.access_key_id().to_string(),
        })
    }

    /// Profile the credentials were resolved from
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Access key id of the resolved credentials
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }
}

fn store_error<E: std::error::Error>(e: E) -> Error {
    Error::StoreUnavailable(DisplayErrorContext(&e).to_string())
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::new(dt.secs(), dt.subsec_nanos() as i32).ok()
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        let response = self.inner.list_buckets().send().await.map_err(store_error)?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| {
                let mut info = ObjectInfo::bucket(b.name().unwrap_or_default());
                info.last_modified = b.creation_date().and_then(to_timestamp);
                info
            })
            .collect();

        Ok(buckets)
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(options.prefix)
            .set_delimiter(options.delimiter)
            .set_max_keys(options.max_keys)
            .set_continuation_token(options.continuation_token)
            .send()
            .await
            .map_err(store_error)?;

        let mut items = Vec::new();

        // Common prefixes (directories)
        for prefix in response.common_prefixes() {
            if let Some(p) = prefix.prefix() {
                items.push(ObjectInfo::dir(p));
            }
        }

        for object in response.contents() {
            let key = object.key().unwrap_or_default();
            let mut info = ObjectInfo::file(key, object.size().unwrap_or(0));
            info.last_modified = object.last_modified().and_then(to_timestamp);

            if let Some(etag) = object.e_tag() {
                info.etag = Some(etag.trim_matches('"').to_string());
            }

            if let Some(sc) = object.storage_class() {
                info.storage_class = Some(sc.as_str().to_string());
            }

            items.push(info);
        }

        tracing::debug!(
            bucket,
            items = items.len(),
            truncated = response.is_truncated().unwrap_or(false),
            "list_objects_v2"
        );

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err = store_error(e);
                if err.to_string().contains("NoSuchKey") {
                    Error::NoSuchRemoteFile(key.to_string())
                } else {
                    err
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(store_error)?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let response = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .set_content_type(content_type)
            .send()
            .await
            .map_err(store_error)?;

        let mut info = ObjectInfo::file(key, size).with_last_modified(jiff::Timestamp::now());
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }

        Ok(info)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<DeleteResult> {
        if keys.is_empty() {
            return Ok(DeleteResult::default());
        }

        let objects = keys
            .iter()
            .map(|k| ObjectIdentifier::builder().key(k).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::General(e.to_string()))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let response = self
            .inner
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(store_error)?;

        let deleted = response
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(str::to_string))
            .collect();

        let failed: Vec<(String, String)> = response
            .errors()
            .iter()
            .filter_map(|e| {
                let reason = e.message().or(e.code()).unwrap_or("unknown error");
                e.key().map(|k| (k.to_string(), reason.to_string()))
            })
            .collect();
        if !failed.is_empty() {
            tracing::warn!("Failed to delete {} object(s)", failed.len());
        }

        Ok(DeleteResult { deleted, failed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_timestamp() {
        let dt = aws_smithy_types::DateTime::from_secs_and_nanos(1_700_000_000, 500);
        let ts = to_timestamp(&dt).unwrap();
        assert_eq!(ts.as_second(), 1_700_000_000);
        assert_eq!(ts.subsec_nanosecond(), 500);
    }

    #[test]
    fn test_connect_options_default() {
        let options = ConnectOptions::default();
        assert!(options.profile.is_none());
        assert!(options.endpoint.is_none());
        assert!(!options.path_style);
    }
}
