use axum::Json;

use crate::api::types::HealthResponse;

/// `GET /api/health`: liveness check.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
