//! Storage configuration types.

use gestor_shared::config::{EvidenceStorageSettings, StorageBackend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Supabase, Cloudflare R2, AWS S3
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Storage access key.
        access_key: String,
        /// Container name.
        container: String,
    },
    /// Local filesystem (development only).
    ///
    /// Objects live under `root/bucket`.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
        /// Directory standing in for the bucket.
        bucket: String,
    },
}

impl StorageProvider {
    /// Create S3-compatible provider.
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self::LocalFs {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } | Self::LocalFs { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
        }
    }

    /// Base URL objects are reachable under when no public URL is configured.
    #[must_use]
    pub fn default_base_url(&self) -> String {
        match self {
            Self::S3 {
                endpoint, bucket, ..
            } => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
            Self::AzureBlob {
                account, container, ..
            } => format!("https://{account}.blob.core.windows.net/{container}"),
            Self::LocalFs { root, bucket } => root.join(bucket).display().to_string(),
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types for upload.
    pub allowed_mime_types: Vec<String>,
    /// Public base URL overriding the provider default.
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Self::default_mime_types(),
            public_base_url: None,
        }
    }

    /// Builds the configuration from application settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected backend is missing credentials.
    pub fn from_settings(settings: &EvidenceStorageSettings) -> Result<Self, StorageError> {
        let required = |value: &Option<String>, name: &str| {
            value.clone().ok_or_else(|| {
                StorageError::configuration(format!(
                    "storage.{name} is required for the {:?} backend",
                    settings.provider
                ))
            })
        };

        let provider = match settings.provider {
            StorageBackend::Local => StorageProvider::local_fs(&settings.root, &settings.bucket),
            StorageBackend::S3 => StorageProvider::s3(
                required(&settings.endpoint, "endpoint")?,
                &settings.bucket,
                required(&settings.access_key_id, "access_key_id")?,
                required(&settings.secret_access_key, "secret_access_key")?,
                &settings.region,
            ),
            StorageBackend::AzureBlob => StorageProvider::azure_blob(
                required(&settings.access_key_id, "access_key_id")?,
                required(&settings.secret_access_key, "secret_access_key")?,
                &settings.bucket,
            ),
        };

        let mut config = Self::new(provider).with_max_file_size(settings.max_file_size);
        config.public_base_url.clone_from(&settings.public_base_url);
        Ok(config)
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the public base URL.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Default allowed MIME types for evidence.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        vec![
            // Documents
            "application/pdf".to_string(),
            "application/msword".to_string(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
            "application/vnd.ms-excel".to_string(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            "application/vnd.ms-powerpoint".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
                .to_string(),
            "text/plain".to_string(),
            // Images
            "image/png".to_string(),
            "image/jpeg".to_string(),
            "image/webp".to_string(),
        ]
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == mime_type)
    }

    /// Base URL used to build public links.
    #[must_use]
    pub fn public_base(&self) -> String {
        self.public_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}
