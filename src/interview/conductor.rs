use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::Summary;
use crate::session::{SessionError, SessionHandle, SessionStep};

use super::voice::{normalize_transcript, VoiceError, VoiceIo};

/// How many times a question is asked before giving up on a blank answer.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

#[derive(Error, Debug)]
pub enum InterviewError {
    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterviewOutcome {
    Completed(Summary),
    Cancelled,
}

/// Drives one session over a voice collaborator.
pub struct Interviewer {
    voice: Arc<dyn VoiceIo>,
    session: SessionHandle,
    max_attempts: usize,
}

impl Interviewer {
    pub fn new(voice: Arc<dyn VoiceIo>, session: SessionHandle) -> Self {
        Self {
            voice,
            session,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Run the interview to completion or until `cancel` fires.
    ///
    /// On cancellation the voice is told to stop and the session is reset.
    /// A voice failure moves the session to `Error`.
    pub async fn run(
        &self,
        patient: &str,
        cancel: CancellationToken,
    ) -> Result<InterviewOutcome, InterviewError> {
        match self.conduct(patient, &cancel).await {
            Ok(Some(summary)) => Ok(InterviewOutcome::Completed(summary)),
            Ok(None) => {
                tracing::info!("Interview cancelled");
                self.voice.cancel().await;
                self.session.reset()?;
                Ok(InterviewOutcome::Cancelled)
            }
            Err(InterviewError::Voice(e)) => {
                tracing::warn!(error = %e, "Voice failure, ending interview");
                if let Err(fail_err) = self.session.fail(&e.to_string()) {
                    tracing::debug!(error = %fail_err, "Could not mark session failed");
                }
                Err(InterviewError::Voice(e))
            }
            Err(e) => Err(e),
        }
    }

    /// `Ok(None)` means cancelled.
    async fn conduct(
        &self,
        patient: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Summary>, InterviewError> {
        let mut question = self.session.start()?;

        let intro = format!(
            "I'm going to ask you some questions about {patient}'s health. Please respond after each question."
        );
        if until_cancelled(cancel, self.voice.speak(&intro)).await.transpose()?.is_none() {
            return Ok(None);
        }

        loop {
            let Some(answer) = self.ask(&question, cancel).await? else {
                return Ok(None);
            };
            match self.session.record_response(&answer)? {
                SessionStep::NextQuestion(next) => question = next,
                SessionStep::SummaryPending(_) => break,
            }
        }

        let Some(summary) = until_cancelled(cancel, self.session.summary()).await else {
            return Ok(None);
        };
        let summary = summary?;

        let closing = format!(
            "Thank you for completing the assessment. Here is the summary of findings: {}",
            summary.narration()
        );
        if until_cancelled(cancel, self.voice.speak(&closing)).await.transpose()?.is_none() {
            return Ok(None);
        }

        Ok(Some(summary))
    }

    /// Speak the question, listen, and have the transcript confirmed or
    /// corrected. Blank transcripts are asked again.
    async fn ask(
        &self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, InterviewError> {
        for attempt in 1..=self.max_attempts {
            if until_cancelled(cancel, self.voice.speak(question)).await.transpose()?.is_none() {
                return Ok(None);
            }
            let Some(heard) = until_cancelled(cancel, self.voice.listen()).await else {
                return Ok(None);
            };
            if let Some(heard) = normalize_transcript(&heard?) {
                let Some(reply) = until_cancelled(cancel, self.voice.confirm(&heard)).await else {
                    return Ok(None);
                };
                let answer = match reply?.as_deref().and_then(normalize_transcript) {
                    Some(corrected) => {
                        tracing::debug!(attempt, "Transcript corrected before recording");
                        corrected
                    }
                    None => heard,
                };
                return Ok(Some(answer));
            }
            tracing::debug!(attempt, "Blank transcript, asking again");
        }
        Err(VoiceError::NoResponse(self.max_attempts).into())
    }
}

async fn until_cancelled<F, T>(cancel: &CancellationToken, fut: F) -> Option<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}
