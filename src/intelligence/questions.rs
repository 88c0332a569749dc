use std::collections::HashSet;
use std::path::Path;

use super::types::QuestionBankError;

/// The fixed, ordered interview script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<String>,
}

impl QuestionBank {
    pub fn new(questions: Vec<String>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        let mut seen = HashSet::new();
        for (i, q) in questions.iter().enumerate() {
            if q.trim().is_empty() {
                return Err(QuestionBankError::BlankQuestion(i + 1));
            }
            if !seen.insert(q.as_str()) {
                return Err(QuestionBankError::Duplicate(q.clone()));
            }
        }
        Ok(Self { questions })
    }

    /// Built-in caregiver script covering falls and the four cognitive domains.
    pub fn standard() -> Self {
        Self {
            questions: [
                "Did your mother have any falls recently?",
                "Has she had any trouble remembering recent events or conversations?",
                "Does she have difficulty recognising familiar people or places?",
                "Does she have trouble finding the right words or following a conversation?",
                "Any trouble with money or bills?",
            ]
            .iter()
            .map(|q| q.to_string())
            .collect(),
        }
    }

    /// Load a JSON array of question strings.
    pub fn from_json_file(path: &Path) -> Result<Self, QuestionBankError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| QuestionBankError::Load(path.display().to_string(), e.to_string()))?;
        let questions: Vec<String> = serde_json::from_str(&json)
            .map_err(|e| QuestionBankError::Parse(path.display().to_string(), e.to_string()))?;
        Self::new(questions)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(String::as_str)
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}
