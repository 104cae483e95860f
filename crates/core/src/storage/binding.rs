//! Storage bindings: direct streamed put/get against an object store.
//!
//! Filesystem and memory backends keep bytes but no ETag (and `fs` no content
//! type). Bindings built from a [`BindingProvider`] therefore write a small
//! JSON sidecar under `.meta/{key}.json` holding the declared content type
//! and a SHA-256 ETag computed while the body streams through.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use opendal::{ErrorKind, Operator, services};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use super::config::{BindingProvider, ObjectStoreCredentials};
use super::error::StorageError;
use super::key::StorageKey;

/// Streamed object body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// An object read back from a binding.
pub struct StoredObject {
    /// Object body.
    pub body: ByteStream,
    /// Stored content type, if the backend keeps one.
    pub content_type: Option<String>,
    /// Size in bytes.
    pub content_length: u64,
    /// Entity tag, native or from sidecar metadata.
    pub etag: Option<String>,
}

impl std::fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredObject")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("etag", &self.etag)
            .finish_non_exhaustive()
    }
}

/// Object storage reachable natively by the running deployment.
///
/// Implementations must stream: `put` consumes the body chunk by chunk and
/// `get` hands back a stream, so no full object is held in memory.
#[async_trait]
pub trait StorageBinding: Send + Sync {
    /// Store `body` under `key`, returning the number of bytes written.
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        body: ByteStream,
    ) -> Result<u64, StorageError>;

    /// Open the object under `key`, or `None` if it does not exist.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError>;

    /// Remove the object under `key`. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Metadata persisted next to an object by sidecar-enabled bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SidecarMetadata {
    content_type: Option<String>,
    etag: String,
}

fn metadata_key(key: &str) -> String {
    format!("{}/{key}.json", StorageKey::METADATA_SCOPE)
}

/// [`StorageBinding`] backed by an OpenDAL operator.
#[derive(Debug, Clone)]
pub struct OperatorBinding {
    operator: Operator,
    sidecar: bool,
}

impl OperatorBinding {
    /// Wrap an existing operator that keeps its own object metadata.
    #[must_use]
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            sidecar: false,
        }
    }

    /// Persist content type and ETag in sidecar objects.
    #[must_use]
    pub fn with_sidecar_metadata(mut self) -> Self {
        self.sidecar = true;
        self
    }

    /// Build the binding for a configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized.
    pub fn from_provider(provider: &BindingProvider) -> Result<Self, StorageError> {
        let operator = match provider {
            BindingProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            BindingProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish(),
        };
        Ok(Self::new(operator).with_sidecar_metadata())
    }

    /// The underlying operator.
    #[must_use]
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    async fn read_metadata(&self, key: &str) -> Result<Option<SidecarMetadata>, StorageError> {
        let buffer = match self.operator.read(&metadata_key(key)).await {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&buffer.to_vec()) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) => {
                warn!(key, error = %e, "unreadable object metadata");
                Ok(None)
            }
        }
    }
}

/// Build the S3-compatible operator for object store credentials.
///
/// Static credentials only; environment and instance-metadata lookups are
/// disabled so presigning never leaves the process.
///
/// # Errors
///
/// Returns an error if the operator cannot be initialized.
pub fn object_store_operator(credentials: &ObjectStoreCredentials) -> Result<Operator, StorageError> {
    let builder = services::S3::default()
        .endpoint(&credentials.endpoint())
        .bucket(&credentials.bucket)
        .access_key_id(&credentials.access_key_id)
        .secret_access_key(&credentials.secret_access_key)
        .region("auto")
        .disable_config_load()
        .disable_ec2_metadata();

    Ok(Operator::new(builder)
        .map_err(|e| StorageError::configuration(e.to_string()))?
        .finish())
}

#[async_trait]
impl StorageBinding for OperatorBinding {
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        mut body: ByteStream,
    ) -> Result<u64, StorageError> {
        let keeps_content_type = self
            .operator
            .info()
            .full_capability()
            .write_with_content_type;

        let mut writer = match content_type {
            Some(ct) if keeps_content_type => {
                self.operator.writer_with(key).content_type(ct).await?
            }
            _ => self.operator.writer(key).await?,
        };

        let mut hasher = self.sidecar.then(Sha256::new);
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    if let Err(abort) = writer.abort().await {
                        warn!(key, error = %abort, "failed to abort partial write");
                    }
                    return Err(e.into());
                }
            };
            if let Some(hasher) = hasher.as_mut() {
                hasher.update(&chunk);
            }
            written += u64::try_from(chunk.len()).unwrap_or(u64::MAX);
            writer.write(chunk).await?;
        }
        writer.close().await?;

        if let Some(hasher) = hasher {
            let metadata = SidecarMetadata {
                content_type: content_type.map(String::from),
                etag: format!("\"{:x}\"", hasher.finalize()),
            };
            let bytes = serde_json::to_vec(&metadata)
                .map_err(|e| StorageError::operation(e.to_string()))?;
            self.operator.write(&metadata_key(key), bytes).await?;
        }

        Ok(written)
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError> {
        let meta = match self.operator.stat(key).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let sidecar = if self.sidecar {
            self.read_metadata(key).await?
        } else {
            None
        };

        let stream = self
            .operator
            .reader(key)
            .await?
            .into_bytes_stream(..)
            .await?;

        let (sidecar_type, sidecar_etag) =
            sidecar.map_or((None, None), |m| (m.content_type, Some(m.etag)));

        Ok(Some(StoredObject {
            body: Box::pin(stream),
            content_type: meta.content_type().map(String::from).or(sidecar_type),
            content_length: meta.content_length(),
            etag: meta.etag().map(String::from).or(sidecar_etag),
        }))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await?;
        if self.sidecar {
            self.operator.delete(&metadata_key(key)).await?;
        }
        Ok(())
    }
}
