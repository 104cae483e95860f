//! Portfolio types and data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transfer::TransferTarget;

/// What a user does on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Uploads files into their own folders.
    #[default]
    Participant,
    /// Reviews folders and leaves evaluations.
    Instructor,
}

impl Role {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Instructor => "instructor",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "participant" => Some(Self::Participant),
            "instructor" => Some(Self::Instructor),
            _ => None,
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// A participant's folder of submitted files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Folder ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Cohort the folder is submitted to, if any.
    pub cohort_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Metadata row for a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File ID.
    pub id: Uuid,
    /// Folder the file belongs to.
    pub folder_id: Uuid,
    /// Storage key of the object.
    pub storage_key: String,
    /// Original file name.
    pub name: String,
    /// Declared size in bytes.
    pub size: i64,
    /// Declared MIME type.
    pub mime_type: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: Role,
}

/// Input for creating a folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    /// Owning user.
    pub user_id: Uuid,
    /// Cohort, if any.
    pub cohort_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
}

/// Input for creating a file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// File ID.
    pub id: Uuid,
    /// Folder ID.
    pub folder_id: Uuid,
    /// Storage key.
    pub storage_key: String,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
}

/// Input for requesting an upload.
#[derive(Debug, Clone)]
pub struct RequestUploadInput {
    /// Target folder.
    pub folder_id: Uuid,
    /// Original file name.
    pub name: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Declared MIME type.
    pub mime_type: String,
}

/// A created file record together with where to send its bytes.
#[derive(Debug, Clone)]
pub struct UploadGrant {
    /// The inserted file record.
    pub file: FileRecord,
    /// Upload target for the object.
    pub target: TransferTarget,
}
