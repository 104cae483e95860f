//! Storage configuration types.

use std::path::PathBuf;

use folio_shared::{BindingSettings, StorageSettings};
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Credentials for the S3-compatible object store (Cloudflare R2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreCredentials {
    /// R2 account id, used to derive the endpoint.
    pub account_id: String,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Bucket name.
    pub bucket: String,
}

impl ObjectStoreCredentials {
    /// Create credentials for the given account and bucket.
    #[must_use]
    pub fn new(
        account_id: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            bucket: bucket.into(),
        }
    }

    /// S3 API endpoint for the account.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

/// Storage binding reachable without external credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BindingProvider {
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory, gone on restart.
    Memory,
}

impl BindingProvider {
    /// Create local filesystem binding.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

/// Storage configuration validated at startup.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Object store credentials; enables signed URLs.
    pub credentials: Option<ObjectStoreCredentials>,
    /// Native binding; enables the streaming proxy when credentials are absent.
    pub binding: Option<BindingProvider>,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Signed URL TTL in seconds.
    pub presign_ttl_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageConfig {
    /// Default max file size: 100MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
    /// Signed URL TTL: 1 hour.
    pub const PRESIGN_TTL_SECS: u64 = 3600;
    /// Bucket used when credentials do not name one.
    pub const DEFAULT_BUCKET: &'static str = "lecture-app-files";

    /// Create a config with no storage capability at all (mock transfers).
    #[must_use]
    pub fn new() -> Self {
        Self {
            credentials: None,
            binding: None,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            presign_ttl_secs: Self::PRESIGN_TTL_SECS,
        }
    }

    /// Set object store credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: ObjectStoreCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set storage binding.
    #[must_use]
    pub fn with_binding(mut self, binding: BindingProvider) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Validate raw settings.
    ///
    /// Blank values count as absent. A partial credential set is rejected
    /// here instead of failing later at signing time.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if only some credential fields are set.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let account_id = present(&settings.account_id);
        let access_key_id = present(&settings.access_key_id);
        let secret_key = present(&settings.secret_key);

        let credentials = match (account_id, access_key_id, secret_key) {
            (None, None, None) => None,
            (Some(account_id), Some(access_key_id), Some(secret_key)) => {
                let bucket = present(&settings.bucket_name)
                    .unwrap_or_else(|| Self::DEFAULT_BUCKET.to_string());
                Some(ObjectStoreCredentials::new(
                    account_id,
                    access_key_id,
                    secret_key,
                    bucket,
                ))
            }
            (account_id, access_key_id, secret_key) => {
                let missing: Vec<&str> = [
                    ("account_id", account_id.is_none()),
                    ("access_key_id", access_key_id.is_none()),
                    ("secret_key", secret_key.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                return Err(StorageError::configuration(format!(
                    "incomplete object store credentials, missing: {}",
                    missing.join(", ")
                )));
            }
        };

        let binding = settings.binding.as_ref().map(|b| match b {
            BindingSettings::Fs { root } => BindingProvider::local_fs(root),
            BindingSettings::Memory => BindingProvider::Memory,
        });

        Ok(Self {
            credentials,
            binding,
            max_file_size: settings
                .max_file_size
                .unwrap_or(Self::DEFAULT_MAX_FILE_SIZE),
            presign_ttl_secs: Self::PRESIGN_TTL_SECS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> StorageSettings {
        StorageSettings::default()
    }

    #[test]
    fn test_endpoint_from_account() {
        let creds = ObjectStoreCredentials::new("acc123", "key", "secret", "bucket");
        assert_eq!(creds.endpoint(), "https://acc123.r2.cloudflarestorage.com");
    }

    #[test]
    fn test_empty_settings_mean_mock() {
        let config = StorageConfig::from_settings(&settings()).expect("valid");
        assert!(config.credentials.is_none());
        assert!(config.binding.is_none());
        assert_eq!(config.max_file_size, StorageConfig::DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.presign_ttl_secs, 3600);
    }

    #[test]
    fn test_full_credentials_default_bucket() {
        let mut s = settings();
        s.account_id = Some("acc".into());
        s.access_key_id = Some("key".into());
        s.secret_key = Some("secret".into());

        let config = StorageConfig::from_settings(&s).expect("valid");
        let creds = config.credentials.expect("credentials");
        assert_eq!(creds.bucket, StorageConfig::DEFAULT_BUCKET);
        assert_eq!(creds.access_key_id, "key");
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let mut s = settings();
        s.access_key_id = Some("key".into());
        s.secret_key = Some("   ".into());

        let err = StorageConfig::from_settings(&s).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, StorageError::Configuration(_)));
        assert!(msg.contains("account_id"));
        assert!(msg.contains("secret_key"));
        assert!(!msg.contains("access_key_id"));
    }

    #[test]
    fn test_binding_mapping() {
        let mut s = settings();
        s.binding = Some(BindingSettings::Fs {
            root: "./data".into(),
        });
        s.max_file_size = Some(1024);

        let config = StorageConfig::from_settings(&s).expect("valid");
        assert_eq!(config.binding, Some(BindingProvider::local_fs("./data")));
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.binding.as_ref().map(BindingProvider::name), Some("local"));
    }
}
