//! Startup wiring of the transfer mechanism.

use std::sync::Arc;

use tracing::info;

use super::broker::TransferBroker;
use super::provider::{MockProvider, ProxyProvider, SignedUrlProvider, TransferProvider};
use crate::storage::{
    OperatorBinding, StorageBinding, StorageConfig, StorageError, object_store_operator,
};

/// Everything the application needs to move object bytes.
#[derive(Clone)]
pub struct StorageStack {
    /// Broker handing out transfer targets.
    pub broker: TransferBroker,
    /// Native binding served by the proxy routes.
    pub binding: Option<Arc<dyn StorageBinding>>,
    /// Store used for server-side deletes: the object store when credentials
    /// exist, the binding otherwise.
    pub objects: Option<Arc<dyn StorageBinding>>,
    /// Upload size limit in bytes.
    pub max_file_size: u64,
}

impl std::fmt::Debug for StorageStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageStack")
            .field("broker", &self.broker)
            .field("binding", &self.binding.is_some())
            .field("objects", &self.objects.is_some())
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

impl StorageStack {
    /// Pick the mechanism once: signed URLs when credentials are present,
    /// else the proxy when a binding is configured, else the mock.
    ///
    /// # Errors
    ///
    /// Returns an error if an operator cannot be built.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let binding: Option<Arc<dyn StorageBinding>> = match &config.binding {
            Some(provider) => Some(Arc::new(OperatorBinding::from_provider(provider)?)),
            None => None,
        };

        let (provider, objects): (Arc<dyn TransferProvider>, Option<Arc<dyn StorageBinding>>) =
            if let Some(credentials) = &config.credentials {
                let operator = object_store_operator(credentials)?;
                let objects: Arc<dyn StorageBinding> =
                    Arc::new(OperatorBinding::new(operator.clone()));
                (
                    Arc::new(SignedUrlProvider::new(operator, config.presign_ttl_secs)),
                    Some(objects),
                )
            } else if binding.is_some() {
                (Arc::new(ProxyProvider), binding.clone())
            } else {
                (Arc::new(MockProvider), None)
            };

        let broker = TransferBroker::new(provider);
        info!(
            mechanism = broker.mechanism().as_str(),
            binding = config.binding.as_ref().map(|b| b.name()),
            "storage stack initialized"
        );

        Ok(Self {
            broker,
            binding,
            objects,
            max_file_size: config.max_file_size,
        })
    }

    /// Stack with an explicit broker and binding.
    #[must_use]
    pub fn new(broker: TransferBroker, binding: Option<Arc<dyn StorageBinding>>) -> Self {
        Self {
            broker,
            objects: binding.clone(),
            binding,
            max_file_size: StorageConfig::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Override the upload size limit.
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}
