//! Storage key construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path uniquely identifying a stored object.
///
/// Format: `{scope}/{random_id}/{name}`. The random id makes keys unguessable
/// from the owner alone and keeps them from ever being reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Scope used for evaluation attachments.
    pub const FEEDBACK_SCOPE: &'static str = "feedback";
    /// Scope holding binding metadata; never addressable by clients.
    pub const METADATA_SCOPE: &'static str = ".meta";

    /// Key for a participant file: `{folder_id}/{uuid}/{name}`.
    #[must_use]
    pub fn for_folder(folder_id: Uuid, name: &str) -> Self {
        Self::scoped(&folder_id.to_string(), Uuid::new_v4(), name)
    }

    /// Key for an evaluation attachment: `feedback/{uuid}/{name}`.
    #[must_use]
    pub fn for_feedback(name: &str) -> Self {
        Self::scoped(Self::FEEDBACK_SCOPE, Uuid::new_v4(), name)
    }

    fn scoped(scope: &str, random_id: Uuid, name: &str) -> Self {
        Self(format!("{scope}/{random_id}/{}", flatten_name(name)))
    }

    /// Whether a client-supplied key stays inside the binding root.
    ///
    /// Rejects empty keys, backslashes, NUL bytes, empty segments (which
    /// covers leading and trailing `/`), `.` and `..` segments, and the
    /// metadata scope.
    #[must_use]
    pub fn is_safe(key: &str) -> bool {
        if key.is_empty() || key.contains(['\\', '\0']) {
            return false;
        }
        if key.split('/').next() == Some(Self::METADATA_SCOPE) {
            return false;
        }
        key.split('/').all(|s| !matches!(s, "" | "." | ".."))
    }

    /// The key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Keep the original name but never let it add or escape path segments.
fn flatten_name(name: &str) -> String {
    match name {
        "" | "." | ".." => "_".to_string(),
        _ => name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_flatten_name() {
        assert_eq!(flatten_name("report.pdf"), "report.pdf");
        assert_eq!(flatten_name("my file (1).pdf"), "my file (1).pdf");
        assert_eq!(flatten_name("../etc/passwd"), ".._etc_passwd");
        assert_eq!(flatten_name("a\\b.txt"), "a_b.txt");
        assert_eq!(flatten_name(".."), "_");
        assert_eq!(flatten_name("."), "_");
        assert_eq!(flatten_name(""), "_");
        assert_eq!(flatten_name("..."), "...");
    }

    #[test]
    fn test_dot_names_stay_inside_the_folder() {
        let key = StorageKey::for_folder(Uuid::new_v4(), "..");
        assert!(key.as_str().ends_with("/_"));
        assert!(StorageKey::is_safe(key.as_str()));
    }

    #[rstest]
    #[case("folderA/id123/report.pdf", true)]
    #[case("feedback/1/notes.txt", true)]
    #[case("f/1/.hidden", true)]
    #[case("f/1/...", true)]
    #[case("", false)]
    #[case("../escaped.txt", false)]
    #[case("f/../../etc/passwd", false)]
    #[case("f/./x", false)]
    #[case("/etc/passwd", false)]
    #[case("f//x", false)]
    #[case("f/1/", false)]
    #[case("f\\..\\x", false)]
    #[case("f/1/a\0b", false)]
    #[case(".meta/f/1/x.json", false)]
    fn test_is_safe(#[case] key: &str, #[case] safe: bool) {
        assert_eq!(StorageKey::is_safe(key), safe);
    }

    #[test]
    fn test_folder_key() {
        let folder_id =
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").expect("valid uuid");
        let key = StorageKey::for_folder(folder_id, "report.pdf");

        let parts: Vec<&str> = key.as_str().split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], folder_id.to_string());
        assert!(Uuid::parse_str(parts[1]).is_ok());
        assert_eq!(parts[2], "report.pdf");
    }

    #[test]
    fn test_feedback_key() {
        let key = StorageKey::for_feedback("notes.docx");
        assert!(key.as_str().starts_with("feedback/"));
        assert!(key.as_str().ends_with("/notes.docx"));
    }

    #[test]
    fn test_keys_are_not_reused() {
        let folder_id = Uuid::new_v4();
        let a = StorageKey::for_folder(folder_id, "same.pdf");
        let b = StorageKey::for_folder(folder_id, "same.pdf");
        assert_ne!(a, b);
    }
}
