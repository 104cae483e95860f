//! The transfer broker.

use std::sync::Arc;

use tracing::debug;

use super::error::TransferError;
use super::provider::TransferProvider;
use super::types::{Disposition, Mechanism, TransferIntent, TransferTarget};

/// Hands out transfer URLs using the mechanism chosen at startup.
///
/// The broker never touches object bytes. Signed targets go straight to the
/// object store; proxied targets route through [`super::proxy_upload`] and
/// [`super::proxy_download`]; mock targets are local stand-ins.
#[derive(Clone)]
pub struct TransferBroker {
    provider: Arc<dyn TransferProvider>,
}

impl std::fmt::Debug for TransferBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferBroker")
            .field("mechanism", &self.provider.mechanism())
            .finish()
    }
}

impl TransferBroker {
    /// Create a broker around a single provider.
    #[must_use]
    pub fn new(provider: Arc<dyn TransferProvider>) -> Self {
        Self { provider }
    }

    /// Mechanism every target from this broker uses.
    #[must_use]
    pub fn mechanism(&self) -> Mechanism {
        self.provider.mechanism()
    }

    /// Produce the target for an intent.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the key is empty or the active mechanism lacks
    ///   a required field
    /// - `Transport` if signing fails
    pub async fn obtain(&self, intent: &TransferIntent) -> Result<TransferTarget, TransferError> {
        if intent.key.is_empty() {
            return Err(TransferError::configuration("storage key must not be empty"));
        }

        let target = self.provider.target(intent).await?;
        debug!(
            key = %intent.key,
            capability = ?intent.capability,
            mechanism = target.mechanism.as_str(),
            "transfer target issued"
        );
        Ok(target)
    }

    /// Target for uploading `key` with `mime_type`.
    ///
    /// # Errors
    ///
    /// See [`TransferBroker::obtain`].
    pub async fn upload_target(
        &self,
        key: &str,
        mime_type: &str,
    ) -> Result<TransferTarget, TransferError> {
        self.obtain(&TransferIntent::upload(key, mime_type)).await
    }

    /// Target for downloading `key`, presented as `display_name`.
    ///
    /// # Errors
    ///
    /// See [`TransferBroker::obtain`].
    pub async fn download_target(
        &self,
        key: &str,
        display_name: Option<&str>,
        disposition: Disposition,
    ) -> Result<TransferTarget, TransferError> {
        self.obtain(&TransferIntent::download(
            key,
            display_name.map(String::from),
            disposition,
        ))
        .await
    }
}
