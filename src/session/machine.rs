use std::sync::Arc;

use uuid::Uuid;

use crate::intelligence::QuestionBank;
use crate::models::{ResponseRecord, Summary};

use super::types::{SessionError, SessionState, SessionStep, SummaryRequest};

/// One interview: fixed questions, recorded answers, derived summary.
///
/// Purely synchronous. Generation itself happens outside (see
/// `SessionHandle`); the session only hands out a `SummaryRequest` and
/// accepts the result back through `complete_summary`.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    id: Uuid,
    questions: Arc<QuestionBank>,
    state: SessionState,
    responses: ResponseRecord,
    summary: Option<Summary>,
    /// Bumped on every start/reset/fail so late results can be told apart.
    generation: u64,
}

impl AssessmentSession {
    pub fn new(questions: Arc<QuestionBank>) -> Self {
        Self {
            id: Uuid::new_v4(),
            questions,
            state: SessionState::Idle,
            responses: ResponseRecord::new(),
            summary: None,
            generation: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    pub fn responses(&self) -> &ResponseRecord {
        &self.responses
    }

    pub fn cached_summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&str> {
        match self.state {
            SessionState::InProgress { index } => self.questions.get(index),
            _ => None,
        }
    }

    /// (answered, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.responses.len(), self.questions.len())
    }

    /// Begin (or restart) the interview. Returns the first question.
    pub fn start(&mut self) -> Result<&str, SessionError> {
        match self.state {
            SessionState::Idle | SessionState::Complete | SessionState::Error { .. } => {}
            _ => return Err(self.usage("start")),
        }

        self.clear();
        self.state = SessionState::InProgress { index: 0 };
        tracing::info!(
            session_id = %self.id,
            generation = self.generation,
            questions = self.questions.len(),
            "Assessment started"
        );

        self.questions
            .get(0)
            .ok_or_else(|| SessionError::Failed("question bank is empty".into()))
    }

    /// Record the answer to the current question and advance.
    pub fn record_response(&mut self, text: &str) -> Result<SessionStep, SessionError> {
        let index = match self.state {
            SessionState::InProgress { index } => index,
            _ => return Err(self.usage("record a response")),
        };
        let question = self
            .questions
            .get(index)
            .ok_or_else(|| SessionError::Failed(format!("no question at index {index}")))?
            .to_string();

        if !self.responses.insert(&question, text) {
            return Err(SessionError::Failed(format!(
                "question {} already answered",
                index + 1
            )));
        }

        let next = index + 1;
        tracing::debug!(
            session_id = %self.id,
            answered = next,
            total = self.questions.len(),
            "Response recorded"
        );

        if next >= self.questions.len() {
            self.state = SessionState::AwaitingSummary;
            tracing::info!(session_id = %self.id, "All questions answered, awaiting summary");
            return Ok(SessionStep::SummaryPending(SummaryRequest {
                generation: self.generation,
                responses: self.responses.clone(),
            }));
        }

        self.state = SessionState::InProgress { index: next };
        let question = self
            .questions
            .get(next)
            .ok_or_else(|| SessionError::Failed(format!("no question at index {next}")))?;
        Ok(SessionStep::NextQuestion(question.to_string()))
    }

    /// Store a generated summary. Rejected when the session has moved on
    /// since `generation` was handed out.
    pub fn complete_summary(
        &mut self,
        generation: u64,
        summary: Summary,
    ) -> Result<&Summary, SessionError> {
        if generation != self.generation || self.state != SessionState::AwaitingSummary {
            return Err(SessionError::StaleGeneration {
                current: self.generation,
                received: generation,
            });
        }

        tracing::info!(
            session_id = %self.id,
            provenance = %summary.provenance,
            "Assessment complete"
        );
        self.state = SessionState::Complete;
        Ok(self.summary.insert(summary))
    }

    /// Unrecoverable orchestration fault (voice device, crashed task).
    pub fn fail(&mut self, reason: &str) -> Result<(), SessionError> {
        match self.state {
            SessionState::InProgress { .. } | SessionState::AwaitingSummary => {}
            _ => return Err(self.usage("fail")),
        }
        tracing::error!(session_id = %self.id, reason, "Assessment failed");
        self.generation += 1;
        self.state = SessionState::Error {
            message: reason.to_string(),
        };
        Ok(())
    }

    /// Back to `Idle` from anywhere. Any pending summary becomes stale.
    pub fn reset(&mut self) {
        self.clear();
        self.state = SessionState::Idle;
        tracing::debug!(session_id = %self.id, generation = self.generation, "Session reset");
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.responses.clear();
        self.summary = None;
    }

    fn usage(&self, operation: &'static str) -> SessionError {
        SessionError::Usage {
            operation,
            state: self.state.clone(),
        }
    }
}
