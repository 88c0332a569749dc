use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::voice::{VoiceError, VoiceIo};

/// Replays canned transcripts. Once the script runs out, `listen` never
/// resolves, which leaves room to exercise cancellation.
#[derive(Default)]
pub struct ScriptedVoice {
    answers: Mutex<VecDeque<Result<String, VoiceError>>>,
    corrections: Mutex<VecDeque<Option<String>>>,
    spoken: Mutex<Vec<String>>,
    cancelled: AtomicBool,
}

impl ScriptedVoice {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| Ok(a.into())).collect()),
            ..Self::default()
        }
    }

    /// Replies to successive confirmations: `None` accepts the transcript,
    /// `Some` replaces it. Once these run out every transcript is accepted.
    pub fn with_corrections<I>(self, corrections: I) -> Self
    where
        I: IntoIterator<Item = Option<&'static str>>,
    {
        if let Ok(mut queue) = self.corrections.lock() {
            queue.extend(corrections.into_iter().map(|c| c.map(String::from)));
        }
        self
    }

    /// Queue a failure after the answers given so far.
    pub fn then_fail(self, error: VoiceError) -> Self {
        if let Ok(mut answers) = self.answers.lock() {
            answers.push_back(Err(error));
        }
        self
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceIo for ScriptedVoice {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
        Ok(())
    }

    async fn listen(&self) -> Result<String, VoiceError> {
        let next = self.answers.lock().ok().and_then(|mut a| a.pop_front());
        match next {
            Some(answer) => answer,
            None => std::future::pending().await,
        }
    }

    async fn confirm(&self, _transcript: &str) -> Result<Option<String>, VoiceError> {
        Ok(self
            .corrections
            .lock()
            .ok()
            .and_then(|mut c| c.pop_front())
            .flatten())
    }

    async fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
