//! Instructor evaluations of participant folders.

mod error;
mod service;
mod types;

pub use error::EvaluationError;
pub use service::{DEFAULT_DOWNLOAD_NAME, EvaluationRepository, EvaluationService};
pub use types::{AttachmentGrant, Evaluation, MAX_SCORE, NewEvaluation};
