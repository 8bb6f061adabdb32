#[cfg(feature = "lambda")]
use crate::core::{ConfigProvider, Storage};
#[cfg(feature = "lambda")]
use crate::utils::error::{Result, UsageError};
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use std::env;

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub store_url: String,
    pub api_key: String,
    pub s3_bucket: String,
    pub s3_prefix: String,
    pub s3_region: String,
    pub timeout_seconds: u64,
    pub month: Option<String>,
}

#[cfg(feature = "lambda")]
impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            env::var(name).map_err(|_| UsageError::MissingConfigError {
                field: name.to_string(),
            })
        };

        Ok(Self {
            store_url: required("STORE_URL")?,
            api_key: required("STORE_API_KEY")?,
            s3_bucket: required("S3_BUCKET")?,
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "usage-reports".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            timeout_seconds: env::var("STORE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::config::DEFAULT_TIMEOUT_SECONDS),
            month: None,
        })
    }

    /// Per-invocation month override taken from the request payload.
    pub fn with_month(mut self, month: Option<String>) -> Self {
        self.month = month;
        self
    }
}

#[cfg(feature = "lambda")]
impl ConfigProvider for LambdaConfig {
    fn store_url(&self) -> &str {
        &self.store_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn output_path(&self) -> &str {
        &self.s3_prefix
    }

    fn report_month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

#[cfg(feature = "lambda")]
impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        // Store endpoint, key, timeout and month
        crate::config::validate_store_settings(self)?;

        // S3 bucket name
        validate_s3_bucket_name("s3_bucket", &self.s3_bucket)?;

        // S3 prefix
        validate_non_empty_string("s3_prefix", &self.s3_prefix)?;

        // Region
        validate_aws_region("s3_region", &self.s3_region)?;

        tracing::debug!("Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(feature = "lambda")]
fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| UsageError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

#[cfg(feature = "lambda")]
fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    crate::utils::validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(UsageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Report bundles under `s3://{bucket}/{prefix}/`.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    prefix: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    fn key(&self, path: &str) -> String {
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix, path)
        }
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let key = self.key(path);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/zip")
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| {
                UsageError::IoError(std::io::Error::other(format!(
                    "Failed to write s3://{}/{}: {}",
                    self.bucket, key, e
                )))
            })?;

        tracing::debug!("Wrote s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
