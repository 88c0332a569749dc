use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::SummaryClient;
use super::prompt::SUMMARY_SYSTEM_PROMPT;
use super::{http_client, non_empty_summary, SummaryError};

pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const OPENAI_TEMPERATURE: f32 = 0.3;
pub const OPENAI_MAX_TOKENS: u32 = 500;

/// Direct chat-completion client. Holds the API key locally.
pub struct OpenAiSummaryClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiSummaryClient {
    /// A missing key is not rejected here; each `generate` call reports it
    /// as `MissingCredential` so callers can fall back per request.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, SummaryError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: http_client(timeout_secs)?,
            timeout_secs,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SummaryClient for OpenAiSummaryClient {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let api_key = self.api_key.as_deref().ok_or(SummaryError::MissingCredential)?;

        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatRequest {
            model: OPENAI_MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SUMMARY_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: OPENAI_TEMPERATURE,
            max_tokens: OPENAI_MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SummaryError::from_reqwest(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SummaryError::MalformedResponse("no choices in response".into()))?;

        non_empty_summary(&content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::summary::test_support::serve;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if auth != "Bearer sk-test" {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"message": "Incorrect API key provided"}})),
            );
        }
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        let echoed = body["messages"][1]["content"].as_str().unwrap_or_default();
        (
            StatusCode::OK,
            Json(json!({"choices": [{"message": {"role": "assistant", "content": format!("  Summary of {echoed}\n")}}]})),
        )
    }

    fn mock_api() -> Router {
        Router::new().route("/v1/chat/completions", post(completions))
    }

    #[tokio::test]
    async fn returns_first_choice_trimmed() {
        let base = serve(mock_api()).await;
        let client = OpenAiSummaryClient::new(&base, Some("sk-test".into()), 5).unwrap();
        assert_eq!(client.generate("prompt").await.unwrap(), "Summary of prompt");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = OpenAiSummaryClient::new("http://127.0.0.1:9", None, 5).unwrap();
        assert!(!client.has_credential());
        assert_eq!(
            client.generate("prompt").await,
            Err(SummaryError::MissingCredential)
        );
    }

    #[tokio::test]
    async fn upstream_error_keeps_status_and_body() {
        let base = serve(mock_api()).await;
        let client = OpenAiSummaryClient::new(&base, Some("sk-wrong".into()), 5).unwrap();
        match client.generate("prompt").await {
            Err(SummaryError::Upstream { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let base = serve(router).await;
        let client = OpenAiSummaryClient::new(&base, Some("sk-test".into()), 5).unwrap();
        assert!(matches!(
            client.generate("prompt").await,
            Err(SummaryError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_connection_error() {
        let client = OpenAiSummaryClient::new("http://127.0.0.1:9", Some("sk-test".into()), 5).unwrap();
        assert!(matches!(
            client.generate("prompt").await,
            Err(SummaryError::Connection(_))
        ));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = OpenAiSummaryClient::new("https://api.openai.com/", None, 30).unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com");
    }
}
