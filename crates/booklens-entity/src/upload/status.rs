//! Upload job status enum and terminal outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an upload job.
///
/// `Queued -> Processing -> {Completed | Failed}`. Terminal states never
/// transition further; a terminal job can only be deleted, not re-queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Waiting in the queue for the processing slot.
    Queued,
    /// Occupying the single processing slot.
    Processing,
    /// Finished successfully.
    Completed,
    /// Finished with an error; see the job's `error_message`.
    Failed,
}

impl UploadStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal outcome reported by the batch processor when a job leaves the
/// processing slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job finished successfully.
    Completed,
    /// The job failed with a human-readable message.
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!UploadStatus::Queued.is_terminal());
        assert!(!UploadStatus::Processing.is_terminal());
        assert!(UploadStatus::Completed.is_terminal());
        assert!(UploadStatus::Failed.is_terminal());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&UploadStatus::Processing).expect("serialize");
        assert_eq!(json, "\"processing\"");
    }
}
