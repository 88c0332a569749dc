use serde::Serialize;
use thiserror::Error;

use crate::models::ResponseRecord;

/// Where a session is in the interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    /// `index` is the question currently awaiting an answer.
    InProgress { index: usize },
    AwaitingSummary,
    Complete,
    Error { message: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InProgress { .. } => "in_progress",
            Self::AwaitingSummary => "awaiting_summary",
            Self::Complete => "complete",
            Self::Error { .. } => "error",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress { index } => write!(f, "in_progress({index})"),
            Self::Error { message } => write!(f, "error({message})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Snapshot handed to the generator when the last answer is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Session generation at the time of the request. A result is only
    /// applied while the session is still on this generation.
    pub generation: u64,
    pub responses: ResponseRecord,
}

/// What the caller should do after a response was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    NextQuestion(String),
    SummaryPending(SummaryRequest),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {operation} while session is {state}")]
    Usage {
        operation: &'static str,
        state: SessionState,
    },

    #[error("Summary result is stale (session generation {current}, result for {received})")]
    StaleGeneration { current: u64, received: u64 },

    #[error("Session failed: {0}")]
    Failed(String),

    #[error("Session lock poisoned")]
    LockPoisoned,

    #[error("No tokio runtime available to run summary generation")]
    NoRuntime,
}
