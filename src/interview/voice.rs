use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Voice device unavailable: {0}")]
    Unavailable(String),

    #[error("Voice operation cancelled")]
    Cancelled,

    #[error("Voice input closed")]
    InputClosed,

    #[error("No answer heard after {0} attempts")]
    NoResponse(usize),

    #[error("Voice I/O error: {0}")]
    Io(String),
}

/// Speech output and transcribed input. Implementations own the devices;
/// callers only see text.
#[async_trait]
pub trait VoiceIo: Send + Sync {
    /// Resolve once the text has been spoken.
    async fn speak(&self, text: &str) -> Result<(), VoiceError>;

    /// Resolve with the next transcript.
    async fn listen(&self) -> Result<String, VoiceError>;

    /// Let the caregiver check a transcript before it is recorded.
    /// `None` accepts it as heard; `Some` carries their correction.
    async fn confirm(&self, transcript: &str) -> Result<Option<String>, VoiceError>;

    /// Stop any speech or listening in progress.
    async fn cancel(&self);
}

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace and trim. `None` for a blank transcript.
pub fn normalize_transcript(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(
            normalize_transcript("  she fell \n\t twice  ").as_deref(),
            Some("she fell twice")
        );
    }

    #[test]
    fn blank_transcript_is_none() {
        assert_eq!(normalize_transcript(""), None);
        assert_eq!(normalize_transcript(" \n "), None);
    }
}
