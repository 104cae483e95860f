//! Transfer Broker.
//!
//! Clients never send file bytes through the JSON API. They ask for a
//! transfer target and then `PUT`/`GET` the bytes against it. Exactly one
//! mechanism is active per process, picked at startup:
//!
//! | Configured                  | Mechanism        | URL                                  |
//! |-----------------------------|------------------|--------------------------------------|
//! | object store credentials    | `direct_signed`  | presigned R2 URL, 1 hour             |
//! | storage binding only        | `proxied`        | `/proxy/upload?key=…`                |
//! | nothing                     | `mock`           | `/mock-upload?key=…`                 |

mod broker;
mod encode;
mod error;
mod provider;
mod proxy;
mod stack;
mod types;

pub use broker::TransferBroker;
pub use encode::{content_disposition, encode_component};
pub use error::TransferError;
pub use provider::{MockProvider, ProxyProvider, SignedUrlProvider, TransferProvider};
pub use proxy::{FALLBACK_CONTENT_TYPE, ProxiedObject, ProxyReceipt, proxy_download, proxy_upload};
pub use stack::StorageStack;
pub use types::{Capability, Disposition, Mechanism, TransferIntent, TransferTarget};

/// Body served by the mock download route.
pub const MOCK_DOWNLOAD_TEXT: &str = "This is a simulated file content for local development.";
