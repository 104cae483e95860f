//! Object storage for portfolio files using Apache OpenDAL.
//!
//! Two kinds of storage back the transfer mechanisms:
//! - an S3-compatible object store (Cloudflare R2) reached with credentials,
//!   used to presign URLs
//! - a native binding (local filesystem or memory) reached without
//!   credentials, streamed through by the proxy
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Apache OpenDAL                              │
//! │                   (Unified Storage API)                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ op.writer_with("key")      │ op.presign_read_with("key", ttl)   │
//! │ op.reader("key")           │ op.presign_write_with("key", ttl)  │
//! │ op.delete("key")           │ op.stat("key")                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod binding;
mod config;
mod error;
mod key;

pub use binding::{ByteStream, OperatorBinding, StorageBinding, StoredObject, object_store_operator};
pub use config::{BindingProvider, ObjectStoreCredentials, StorageConfig};
pub use error::StorageError;
pub use key::StorageKey;
