//! Transfer mechanisms.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use opendal::Operator;

use super::encode::{content_disposition, encode_component};
use super::error::TransferError;
use super::types::{Capability, Mechanism, TransferIntent, TransferTarget};

/// One way of turning an intent into a URL.
#[async_trait]
pub trait TransferProvider: Send + Sync {
    /// Mechanism tag of every target this provider returns.
    fn mechanism(&self) -> Mechanism;

    /// Produce the target for `intent`. Never reads or writes object bytes.
    async fn target(&self, intent: &TransferIntent) -> Result<TransferTarget, TransferError>;
}

/// Presigned URLs straight to the object store.
#[derive(Debug, Clone)]
pub struct SignedUrlProvider {
    operator: Operator,
    ttl: Duration,
}

impl SignedUrlProvider {
    /// Create a provider signing with `operator` for `ttl_secs` seconds.
    #[must_use]
    pub fn new(operator: Operator, ttl_secs: u64) -> Self {
        Self {
            operator,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn ttl_secs(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)
    }
}

#[async_trait]
impl TransferProvider for SignedUrlProvider {
    fn mechanism(&self) -> Mechanism {
        Mechanism::DirectSigned
    }

    async fn target(&self, intent: &TransferIntent) -> Result<TransferTarget, TransferError> {
        let signed_at = Utc::now();

        let (presigned, headers) = match intent.capability {
            Capability::Upload => {
                let mime_type = intent.mime_type.as_deref().ok_or_else(|| {
                    TransferError::configuration("mime type is required for a signed upload URL")
                })?;
                let presigned = self
                    .operator
                    .presign_write_with(&intent.key, self.ttl)
                    .content_type(mime_type)
                    .await
                    .map_err(TransferError::transport)?;
                (presigned, vec![("Content-Type", mime_type.to_string())])
            }
            Capability::Download => {
                let name = intent.display_name.as_deref().ok_or_else(|| {
                    TransferError::configuration(
                        "display name is required for a signed download URL",
                    )
                })?;
                let presigned = self
                    .operator
                    .presign_read_with(&intent.key, self.ttl)
                    .override_content_disposition(&content_disposition(intent.disposition, name))
                    .await
                    .map_err(TransferError::transport)?;
                (presigned, Vec::new())
            }
        };

        let mut target = TransferTarget {
            url: presigned.uri().to_string(),
            mechanism: Mechanism::DirectSigned,
            method: presigned.method().to_string(),
            headers: std::collections::HashMap::new(),
            expires_at: Some(signed_at + chrono::Duration::seconds(self.ttl_secs())),
        };
        for (name, value) in headers {
            target = target.with_header(name, value);
        }
        Ok(target)
    }
}

/// Same-origin URLs served by the streaming proxy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyProvider;

#[async_trait]
impl TransferProvider for ProxyProvider {
    fn mechanism(&self) -> Mechanism {
        Mechanism::Proxied
    }

    async fn target(&self, intent: &TransferIntent) -> Result<TransferTarget, TransferError> {
        let key = encode_component(&intent.key);
        let target = match intent.capability {
            Capability::Upload => {
                let target = TransferTarget::unbounded(
                    format!("/proxy/upload?key={key}"),
                    Mechanism::Proxied,
                    Capability::Upload,
                );
                match &intent.mime_type {
                    Some(mime_type) => target.with_header("Content-Type", mime_type.clone()),
                    None => target,
                }
            }
            Capability::Download => {
                let url = match &intent.display_name {
                    Some(name) => format!(
                        "/proxy/download?key={key}&name={}",
                        encode_component(name)
                    ),
                    None => format!("/proxy/download?key={key}"),
                };
                TransferTarget::unbounded(url, Mechanism::Proxied, Capability::Download)
            }
        };
        Ok(target)
    }
}

/// Local stand-in URLs; uploads are discarded, downloads return placeholder text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

#[async_trait]
impl TransferProvider for MockProvider {
    fn mechanism(&self) -> Mechanism {
        Mechanism::Mock
    }

    async fn target(&self, intent: &TransferIntent) -> Result<TransferTarget, TransferError> {
        let key = encode_component(&intent.key);
        let path = match intent.capability {
            Capability::Upload => "/mock-upload",
            Capability::Download => "/mock-download",
        };
        Ok(TransferTarget::unbounded(
            format!("{path}?key={key}"),
            Mechanism::Mock,
            intent.capability,
        ))
    }
}
