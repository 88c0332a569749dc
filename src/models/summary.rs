use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cognitive line text when no condition fired.
pub const NO_COGNITIVE_CONCERNS: &str = "No concerns identified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallsStatus {
    Concern,
    NoConcern,
}

impl FallsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concern => "Concern",
            Self::NoConcern => "No concern",
        }
    }
}

impl std::fmt::Display for FallsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Remote,
    Fallback,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// The falls and cognitive summary of one completed interview.
///
/// `falls` and `conditions` always come from the rule-based inferencer,
/// whichever tier wrote `body`, so consumers never parse the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub falls: FallsStatus,
    pub conditions: Vec<String>,
    pub provenance: Provenance,
    pub body: String,
    pub generated_at: DateTime<Utc>,
}

impl Summary {
    pub fn has_cognitive_concern(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Comma-joined condition names, or the no-concern text.
    pub fn cognitive_line(&self) -> String {
        if self.conditions.is_empty() {
            NO_COGNITIVE_CONCERNS.to_string()
        } else {
            self.conditions.join(", ")
        }
    }

    /// Single-line form for text-to-speech.
    pub fn narration(&self) -> String {
        self.body
            .trim()
            .replace("\n\n", ". ")
            .replace('\n', " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(conditions: &[&str], body: &str) -> Summary {
        Summary {
            falls: FallsStatus::NoConcern,
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            provenance: Provenance::Fallback,
            body: body.to_string(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn falls_status_labels() {
        assert_eq!(FallsStatus::Concern.as_str(), "Concern");
        assert_eq!(FallsStatus::NoConcern.to_string(), "No concern");
    }

    #[test]
    fn cognitive_line_joins_conditions() {
        assert_eq!(summary(&[], "").cognitive_line(), "No concerns identified");
        assert_eq!(
            summary(&["Agnosia", "Aphasia"], "").cognitive_line(),
            "Agnosia, Aphasia"
        );
    }

    #[test]
    fn narration_flattens_paragraphs() {
        let s = summary(
            &[],
            "Falls history: No concern\n\nCognitive history: No concerns identified",
        );
        assert_eq!(
            s.narration(),
            "Falls history: No concern. Cognitive history: No concerns identified"
        );
    }

    #[test]
    fn provenance_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Provenance::Fallback).unwrap(), "\"fallback\"");
    }
}
