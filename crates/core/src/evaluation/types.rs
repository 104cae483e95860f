//! Evaluation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transfer::TransferTarget;

/// Highest score an evaluation may carry.
pub const MAX_SCORE: i32 = 100;

/// Instructor feedback on a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Evaluation ID.
    pub id: Uuid,
    /// Evaluated folder.
    pub folder_id: Uuid,
    /// Instructor who wrote it.
    pub instructor_id: Uuid,
    /// Free-form comments.
    pub comments: String,
    /// Score from 0 to 100, if graded.
    pub score: Option<i32>,
    /// Storage key of an attached file.
    pub attachment_key: Option<String>,
    /// Display name of the attached file.
    pub attachment_name: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating an evaluation.
#[derive(Debug, Clone, Default)]
pub struct NewEvaluation {
    /// Evaluated folder.
    pub folder_id: Uuid,
    /// Instructor ID.
    pub instructor_id: Uuid,
    /// Comments.
    pub comments: String,
    /// Score.
    pub score: Option<i32>,
    /// Attachment key returned by an earlier attachment upload.
    pub attachment_key: Option<String>,
    /// Attachment display name.
    pub attachment_name: Option<String>,
}

/// Where to upload an evaluation attachment.
#[derive(Debug, Clone)]
pub struct AttachmentGrant {
    /// Key to store on the evaluation afterwards.
    pub key: String,
    /// Upload target.
    pub target: TransferTarget,
}
