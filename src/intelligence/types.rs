use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DetectedSymptoms, FallsStatus};

// ---------------------------------------------------------------------------
// Detection evidence
// ---------------------------------------------------------------------------

/// Why a keyword match was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Negation {
    /// A negation word sat within the proximity window of a keyword.
    Proximity { word: String, distance: usize },
    /// A negating phrase appeared anywhere in the answer.
    Phrase(String),
}

/// Outcome of running one symptom pattern over one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub symptom: String,
    /// Catalog terms found in the answer (keywords and positive indicators).
    pub matched_terms: Vec<String>,
    pub negation: Option<Negation>,
}

impl Detection {
    pub fn is_positive(&self) -> bool {
        !self.matched_terms.is_empty() && self.negation.is_none()
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// Symptoms and conditions derived from a full set of answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inference {
    pub symptoms: DetectedSymptoms,
    /// Fired conditions in rule-table order, display rewrites applied.
    pub conditions: Vec<String>,
}

impl Inference {
    pub fn falls_status(&self) -> FallsStatus {
        if self.symptoms.contains(FALLS_SYMPTOM) {
            FallsStatus::Concern
        } else {
            FallsStatus::NoConcern
        }
    }
}

/// Symptom id that drives the falls line of a summary.
pub const FALLS_SYMPTOM: &str = "falls";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Symptom pattern with empty id")]
    EmptySymptomId,

    #[error("Duplicate symptom id: {0}")]
    DuplicateSymptom(String),

    #[error("Symptom '{0}' has no keywords")]
    NoKeywords(String),

    #[error("Condition '{0}' requires no symptoms")]
    EmptyRule(String),

    #[error("'{owner}' references unknown symptom '{symptom}'")]
    UnknownSymptom { owner: String, symptom: String },

    #[error("Augmentation targets unknown condition '{0}'")]
    UnknownCondition(String),

    #[error("Failed to read reference data {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse reference data {0}: {1}")]
    Parse(String, String),
}

#[derive(Error, Debug)]
pub enum QuestionBankError {
    #[error("Question bank is empty")]
    Empty,

    #[error("Question {0} is blank")]
    BlankQuestion(usize),

    #[error("Duplicate question: {0}")]
    Duplicate(String),

    #[error("Failed to read question file {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse question file {0}: {1}")]
    Parse(String, String),
}
