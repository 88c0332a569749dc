use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::SummaryClient;
use super::{http_client, non_empty_summary, SummaryError};

/// Path of the server-mediated summary endpoint.
pub const PROXY_SUMMARY_PATH: &str = "/api/openai/generate-summary";

/// Server-mediated client: POSTs the prompt to our proxy, which holds the key.
pub struct ProxySummaryClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ProxyResponse {
    summary: Option<String>,
}

impl ProxySummaryClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, SummaryError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout_secs)?,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SummaryClient for ProxySummaryClient {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let url = format!("{}{}", self.base_url, PROXY_SUMMARY_PATH);

        let response = self
            .client
            .post(&url)
            .json(&ProxyRequest { prompt })
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

        let parsed: ProxyResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;

        let summary = parsed
            .summary
            .ok_or_else(|| SummaryError::MalformedResponse("missing summary field".into()))?;
        non_empty_summary(&summary)
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}
