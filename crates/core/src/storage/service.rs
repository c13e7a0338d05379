//! Storage service implementation using Apache OpenDAL.

use gestor_shared::types::{ManagerReportId, ProductId};
use opendal::{ErrorKind, Operator, services};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use crate::ports::EvidenceStore;

/// An evidence file as received from the user.
#[derive(Debug, Clone)]
pub struct EvidenceFile {
    /// Original file name.
    pub file_name: String,
    /// Content type (MIME type).
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl EvidenceFile {
    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }
}

/// Stable reference to an uploaded evidence file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// Publicly readable URL.
    pub public_url: String,
    /// Key inside the bucket.
    pub storage_key: String,
    /// Original file name.
    pub file_name: String,
}

/// Storage service for evidence files.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root, bucket } => {
                let dir = root.join(bucket);
                let builder = services::Fs::default().root(
                    dir.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Validate a file against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is empty, too large or of a refused type.
    pub fn validate_upload(&self, file: &EvidenceFile) -> Result<(), StorageError> {
        if file.bytes.is_empty() {
            return Err(StorageError::EmptyFile {
                file_name: file.file_name.clone(),
            });
        }

        let size = file.size();
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(&file.content_type) {
            return Err(StorageError::invalid_mime_type(&file.content_type));
        }

        Ok(())
    }

    /// Generate the storage path for a piece of evidence.
    ///
    /// Format: `{report_id}/{product_id}/{upload_id}-{sanitized_filename}`
    #[must_use]
    pub fn evidence_path(
        manager_report_id: ManagerReportId,
        product_id: ProductId,
        file_name: &str,
    ) -> String {
        format!(
            "{manager_report_id}/{product_id}/{}-{}",
            Uuid::now_v7().simple(),
            sanitize_filename(file_name)
        )
    }

    /// Upload a file and return its public reference.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the bucket is not the
    /// configured one, or the backend write fails.
    pub async fn upload(
        &self,
        file: &EvidenceFile,
        bucket: &str,
        path: &str,
    ) -> Result<EvidenceRef, StorageError> {
        self.validate_upload(file)?;

        if bucket != self.bucket() {
            return Err(StorageError::UnknownBucket {
                requested: bucket.to_string(),
                configured: self.bucket().to_string(),
            });
        }
        let key = path.trim_start_matches('/');
        if key.is_empty() || key.ends_with('/') || key.split('/').any(|part| part == "..") {
            return Err(StorageError::InvalidKey(path.to_string()));
        }

        self.operator
            .write_with(key, file.bytes.clone())
            .content_type(&file.content_type)
            .await
            .map_err(StorageError::from)?;

        tracing::info!(
            provider = self.provider_name(),
            bucket,
            key,
            size = file.size(),
            "Uploaded evidence file"
        );

        Ok(EvidenceRef {
            public_url: format!("{}/{key}", self.config.public_base()),
            storage_key: key.to_string(),
            file_name: file.file_name.clone(),
        })
    }

    /// Delete a file from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(key, error = %e, "Could not stat evidence file");
                false
            }
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }
}

impl EvidenceStore for StorageService {
    async fn upload_evidence_file(
        &self,
        file: &EvidenceFile,
        bucket: &str,
        path: &str,
    ) -> Result<EvidenceRef, StorageError> {
        self.upload(file, bucket, path).await
    }

    fn evidence_bucket(&self) -> &str {
        self.bucket()
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}
