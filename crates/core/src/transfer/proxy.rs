//! Same-origin proxy between HTTP bodies and the storage binding.
//!
//! Neither direction buffers a whole object: uploads are forwarded chunk by
//! chunk into the binding writer and downloads hand back the binding's
//! stream untouched.

use bytes::Bytes;
use futures::{StreamExt, stream};

use super::encode::content_disposition;
use super::error::TransferError;
use super::types::Disposition;
use crate::storage::{ByteStream, StorageBinding, StorageKey};

/// Content type used when neither the request nor the backend supplies one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Result of a proxied upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyReceipt {
    /// Key the object was stored under.
    pub key: String,
    /// Bytes forwarded to the binding.
    pub bytes_written: u64,
}

/// Object streamed back by a proxied download.
pub struct ProxiedObject {
    /// Body, streamed from the binding.
    pub body: ByteStream,
    /// Content type stored with the object, if any.
    pub content_type: Option<String>,
    /// Size in bytes.
    pub content_length: u64,
    /// Entity tag, if the backend provides one.
    pub etag: Option<String>,
    /// `Content-Disposition` value when a display name was given.
    pub content_disposition: Option<String>,
}

impl std::fmt::Debug for ProxiedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxiedObject")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("etag", &self.etag)
            .field("content_disposition", &self.content_disposition)
            .finish_non_exhaustive()
    }
}

/// Stream a request body into the binding under `key`.
///
/// # Errors
///
/// Checked in order: `MissingKey`, `InvalidKey`, `MissingBinding`,
/// `MissingBody` (also for a body that yields only empty chunks), then
/// `Transport` for write failures.
pub async fn proxy_upload(
    binding: Option<&dyn StorageBinding>,
    key: Option<&str>,
    content_type: Option<&str>,
    body: ByteStream,
) -> Result<ProxyReceipt, TransferError> {
    let key = checked_key(key)?;
    let binding = binding.ok_or(TransferError::MissingBinding)?;

    let (first, rest) = first_chunk(body).await?;
    let body: ByteStream = Box::pin(stream::once(async move { Ok(first) }).chain(rest));

    let bytes_written = binding.put(key, content_type, body).await?;

    Ok(ProxyReceipt {
        key: key.to_string(),
        bytes_written,
    })
}

/// Open the object under `key` for streaming back to the client.
///
/// # Errors
///
/// `MissingKey`, `InvalidKey`, `MissingBinding`, `NotFound` when the object
/// is absent, or `Transport` for read failures.
pub async fn proxy_download(
    binding: Option<&dyn StorageBinding>,
    key: Option<&str>,
    display_name: Option<&str>,
) -> Result<ProxiedObject, TransferError> {
    let key = checked_key(key)?;
    let binding = binding.ok_or(TransferError::MissingBinding)?;

    let object = binding
        .get(key)
        .await?
        .ok_or_else(|| TransferError::NotFound {
            key: key.to_string(),
        })?;

    Ok(ProxiedObject {
        body: object.body,
        content_type: object.content_type,
        content_length: object.content_length,
        etag: object.etag,
        content_disposition: display_name
            .filter(|n| !n.is_empty())
            .map(|n| content_disposition(Disposition::Inline, n)),
    })
}

fn checked_key(key: Option<&str>) -> Result<&str, TransferError> {
    let key = key.filter(|k| !k.is_empty()).ok_or(TransferError::MissingKey)?;
    if !StorageKey::is_safe(key) {
        return Err(TransferError::InvalidKey);
    }
    Ok(key)
}

/// Pull chunks until the first non-empty one.
async fn first_chunk(mut body: ByteStream) -> Result<(Bytes, ByteStream), TransferError> {
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(TransferError::transport)?;
        if !chunk.is_empty() {
            return Ok((chunk, body));
        }
    }
    Err(TransferError::MissingBody)
}
