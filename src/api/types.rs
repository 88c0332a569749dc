use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pipeline::summary::OpenAiSummaryClient;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiContext {
    pub client: Arc<OpenAiSummaryClient>,
}

impl ApiContext {
    pub fn new(client: OpenAiSummaryClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// `POST /api/openai/generate-summary` request body.
#[derive(Debug, Deserialize)]
pub struct GenerateSummaryRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateSummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
