use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::watch;
use uuid::Uuid;

use crate::intelligence::QuestionBank;
use crate::models::{ResponseRecord, Summary};
use crate::pipeline::summary::SummaryGenerator;

use super::machine::AssessmentSession;
use super::types::{SessionError, SessionState, SessionStep, SummaryRequest};

/// Shared handle to one session. Runs summary generation on a tokio task
/// once the last answer is in, and publishes every state change.
///
/// Clones share the same session; separate handles never share state.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<AssessmentSession>>,
    generator: Arc<SummaryGenerator>,
    updates: Arc<watch::Sender<SessionState>>,
}

impl SessionHandle {
    pub fn new(questions: Arc<QuestionBank>, generator: Arc<SummaryGenerator>) -> Self {
        let (updates, _) = watch::channel(SessionState::Idle);
        Self {
            session: Arc::new(Mutex::new(AssessmentSession::new(questions))),
            generator,
            updates: Arc::new(updates),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AssessmentSession>, SessionError> {
        self.session.lock().map_err(|_| SessionError::LockPoisoned)
    }

    fn publish(&self, state: &SessionState) {
        self.updates.send_replace(state.clone());
    }

    pub fn id(&self) -> Result<Uuid, SessionError> {
        Ok(self.lock()?.id())
    }

    /// Latest published state.
    pub fn state(&self) -> SessionState {
        self.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.updates.subscribe()
    }

    pub fn current_question(&self) -> Result<Option<String>, SessionError> {
        Ok(self.lock()?.current_question().map(str::to_string))
    }

    pub fn progress(&self) -> Result<(usize, usize), SessionError> {
        Ok(self.lock()?.progress())
    }

    pub fn responses(&self) -> Result<ResponseRecord, SessionError> {
        Ok(self.lock()?.responses().clone())
    }

    pub fn cached_summary(&self) -> Result<Option<Summary>, SessionError> {
        Ok(self.lock()?.cached_summary().cloned())
    }

    pub fn start(&self) -> Result<String, SessionError> {
        let mut session = self.lock()?;
        let first = session.start()?.to_string();
        self.publish(session.state());
        Ok(first)
    }

    /// Record an answer. When it was the last one, generation starts in
    /// the background on the current tokio runtime. Without a runtime the
    /// call fails with `NoRuntime` and the session is left unchanged.
    pub fn record_response(&self, text: &str) -> Result<SessionStep, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        let step = {
            let mut session = self.lock()?;
            let step = session.record_response(text)?;
            self.publish(session.state());
            step
        };

        if let SessionStep::SummaryPending(request) = &step {
            self.spawn_generation(&runtime, request.clone());
        }
        Ok(step)
    }

    pub fn reset(&self) -> Result<(), SessionError> {
        let mut session = self.lock()?;
        session.reset();
        self.publish(session.state());
        Ok(())
    }

    pub fn fail(&self, reason: &str) -> Result<(), SessionError> {
        let mut session = self.lock()?;
        session.fail(reason)?;
        self.publish(session.state());
        Ok(())
    }

    /// The session's summary, waiting while it is being generated.
    ///
    /// Never triggers generation itself, so repeated calls return the same
    /// cached value.
    pub async fn summary(&self) -> Result<Summary, SessionError> {
        let mut updates = self.updates.subscribe();
        loop {
            {
                let session = self.lock()?;
                match session.state() {
                    SessionState::Complete => {
                        return session
                            .cached_summary()
                            .cloned()
                            .ok_or_else(|| SessionError::Failed("completed without summary".into()));
                    }
                    SessionState::AwaitingSummary => {}
                    SessionState::Error { message } => {
                        return Err(SessionError::Failed(message.clone()));
                    }
                    other => {
                        return Err(SessionError::Usage {
                            operation: "read the summary",
                            state: other.clone(),
                        })
                    }
                }
            }
            if updates.changed().await.is_err() {
                return Err(SessionError::Failed("session closed".into()));
            }
        }
    }

    fn spawn_generation(&self, runtime: &Handle, request: SummaryRequest) {
        let handle = self.clone();
        let worker = runtime.clone();
        runtime.spawn(async move {
            let generator = handle.generator.clone();
            let responses = request.responses;
            let task = worker.spawn(async move { generator.generate(&responses).await });

            match task.await {
                Ok(summary) => handle.apply_summary(request.generation, summary),
                Err(e) => {
                    tracing::error!(error = %e, "Summary generation task failed");
                    if let Err(e) = handle.fail("summary generation task failed") {
                        tracing::debug!(error = %e, "Session already moved on");
                    }
                }
            }
        });
    }

    fn apply_summary(&self, generation: u64, summary: Summary) {
        let Ok(mut session) = self.lock() else {
            tracing::error!("Session lock poisoned, dropping summary");
            return;
        };
        match session.complete_summary(generation, summary) {
            Ok(_) => self.publish(session.state()),
            Err(e) => tracing::debug!(error = %e, "Discarding stale summary"),
        }
    }
}
