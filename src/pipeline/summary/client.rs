use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::SummaryError;

/// Remote text-generation collaborator (allows mocking).
#[async_trait]
pub trait SummaryClient: Send + Sync {
    /// Submit a prompt and return the generated summary body.
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Client used when remote generation is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSummaryClient;

#[async_trait]
impl SummaryClient for DisabledSummaryClient {
    async fn generate(&self, _prompt: &str) -> Result<String, SummaryError> {
        Err(SummaryError::Disabled)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Mock client for testing: replays scripted results and counts calls.
pub struct MockSummaryClient {
    script: Mutex<VecDeque<Result<String, SummaryError>>>,
    repeat: Result<String, SummaryError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockSummaryClient {
    /// Always answers with `response`.
    pub fn new(response: &str) -> Self {
        Self::with_repeat(Ok(response.to_string()))
    }

    /// Always fails with `error`.
    pub fn failing(error: SummaryError) -> Self {
        Self::with_repeat(Err(error))
    }

    fn with_repeat(repeat: Result<String, SummaryError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat,
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Results returned (in order) before falling back to the repeat value.
    pub fn with_script(self, script: Vec<Result<String, SummaryError>>) -> Self {
        if let Ok(mut queue) = self.script.lock() {
            queue.extend(script);
        }
        self
    }

    /// Sleep before answering, to exercise timeouts and stale results.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SummaryClient for MockSummaryClient {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.script.lock().ok().and_then(|mut q| q.pop_front());
        scripted.unwrap_or_else(|| self.repeat.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_client_returns_configured_response() {
        let client = MockSummaryClient::new("test response");
        assert_eq!(client.generate("prompt").await.unwrap(), "test response");
        assert_eq!(client.calls(), 1);
        assert_eq!(client.prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn mock_client_plays_script_then_repeats() {
        let client = MockSummaryClient::new("steady")
            .with_script(vec![Err(SummaryError::EmptySummary)]);
        assert_eq!(client.generate("p").await, Err(SummaryError::EmptySummary));
        assert_eq!(client.generate("p").await.unwrap(), "steady");
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn disabled_client_always_fails() {
        assert_eq!(
            DisabledSummaryClient.generate("p").await,
            Err(SummaryError::Disabled)
        );
    }
}
