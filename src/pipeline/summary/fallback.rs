use chrono::Utc;

use crate::intelligence::Inference;
use crate::models::{Provenance, Summary};

/// Tier 2: the fixed-format summary built from rule-based inference alone.
///
/// Pure and infallible; this is where every failed remote attempt ends up.
pub fn compose_fallback(inference: &Inference) -> Summary {
    let mut summary = Summary {
        falls: inference.falls_status(),
        conditions: inference.conditions.clone(),
        provenance: Provenance::Fallback,
        body: String::new(),
        generated_at: Utc::now(),
    };
    summary.body = format!(
        "Falls history: {}\n\nCognitive history: {}",
        summary.falls,
        summary.cognitive_line()
    );
    summary
}
