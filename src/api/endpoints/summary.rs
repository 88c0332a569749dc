use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, GenerateSummaryRequest, GenerateSummaryResponse};
use crate::pipeline::summary::SummaryClient;

/// `POST /api/openai/generate-summary`: forward a prompt to the
/// chat-completion API with the server's key.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Json(req): Json<GenerateSummaryRequest>,
) -> Result<Json<GenerateSummaryResponse>, ApiError> {
    let prompt = req
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Prompt is required".into()))?;

    if !ctx.client.has_credential() {
        return Err(ApiError::MissingCredential);
    }

    tracing::info!(prompt_chars = prompt.chars().count(), "Forwarding summary prompt");
    let summary = ctx.client.generate(&prompt).await?;
    Ok(Json(GenerateSummaryResponse { summary }))
}
