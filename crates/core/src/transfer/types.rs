//! Transfer intents and targets.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the client intends to do with the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// `PUT` raw bytes.
    Upload,
    /// `GET` raw bytes.
    Download,
}

impl Capability {
    /// HTTP method the client uses with the returned URL.
    #[must_use]
    pub fn method(self) -> &'static str {
        match self {
            Self::Upload => "PUT",
            Self::Download => "GET",
        }
    }
}

/// How a browser should present a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// In-app preview.
    #[default]
    Inline,
    /// Forced download.
    Attachment,
}

impl Disposition {
    /// Header token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        }
    }
}

/// Which mechanism produced a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    /// Presigned URL straight to the object store.
    DirectSigned,
    /// Same-origin proxy streaming through the storage binding.
    Proxied,
    /// Local stand-in without durability.
    Mock,
}

impl Mechanism {
    /// Stable name for logs and responses.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectSigned => "direct_signed",
            Self::Proxied => "proxied",
            Self::Mock => "mock",
        }
    }
}

/// Input to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    /// Storage key, used verbatim.
    pub key: String,
    /// Upload or download.
    pub capability: Capability,
    /// Declared content type (uploads).
    pub mime_type: Option<String>,
    /// Name presented to the user (downloads).
    pub display_name: Option<String>,
    /// Presentation of a download.
    pub disposition: Disposition,
}

impl TransferIntent {
    /// Intent to upload `key` with the given content type.
    #[must_use]
    pub fn upload(key: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            capability: Capability::Upload,
            mime_type: Some(mime_type.into()),
            display_name: None,
            disposition: Disposition::default(),
        }
    }

    /// Intent to download `key`.
    #[must_use]
    pub fn download(
        key: impl Into<String>,
        display_name: Option<String>,
        disposition: Disposition,
    ) -> Self {
        Self {
            key: key.into(),
            capability: Capability::Download,
            mime_type: None,
            display_name,
            disposition,
        }
    }
}

/// URL the client uses directly for the transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTarget {
    /// Absolute (signed) or same-origin URL.
    pub url: String,
    /// Mechanism that produced the URL.
    pub mechanism: Mechanism,
    /// HTTP method to use.
    pub method: String,
    /// Headers the request must carry.
    pub headers: HashMap<String, String>,
    /// Expiry of a signed URL; `None` for proxy and mock URLs.
    pub expires_at: Option<DateTime<Utc>>,
}

impl TransferTarget {
    /// Target that does not expire.
    #[must_use]
    pub fn unbounded(url: String, mechanism: Mechanism, capability: Capability) -> Self {
        Self {
            url,
            mechanism,
            method: capability.method().to_string(),
            headers: HashMap::new(),
            expires_at: None,
        }
    }

    /// Require a header on the client request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_methods() {
        assert_eq!(Capability::Upload.method(), "PUT");
        assert_eq!(Capability::Download.method(), "GET");
    }

    #[test]
    fn test_mechanism_names() {
        assert_eq!(Mechanism::DirectSigned.as_str(), "direct_signed");
        assert_eq!(Mechanism::Proxied.as_str(), "proxied");
        assert_eq!(Mechanism::Mock.as_str(), "mock");
    }

    #[test]
    fn test_default_disposition_is_inline() {
        assert_eq!(Disposition::default(), Disposition::Inline);
        assert_eq!(Disposition::Attachment.as_str(), "attachment");
    }

    #[test]
    fn test_upload_intent() {
        let intent = TransferIntent::upload("a/b/c.pdf", "application/pdf");
        assert_eq!(intent.capability, Capability::Upload);
        assert_eq!(intent.mime_type.as_deref(), Some("application/pdf"));
        assert!(intent.display_name.is_none());
    }
}
