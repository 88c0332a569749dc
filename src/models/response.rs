use serde::{Deserialize, Serialize};

/// One answered question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionResponse {
    pub question: String,
    pub answer: String,
}

/// Answers keyed by question, kept in the order they were asked.
///
/// Append-only: a question can be answered once and an answer is never
/// edited after it has been recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseRecord {
    entries: Vec<QuestionResponse>,
}

impl ResponseRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. Returns false (and records nothing) when the
    /// question already has one.
    pub fn insert(&mut self, question: &str, answer: &str) -> bool {
        if self.answer_for(question).is_some() {
            return false;
        }
        self.entries.push(QuestionResponse {
            question: question.to_string(),
            answer: answer.to_string(),
        });
        true
    }

    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.question == question)
            .map(|e| e.answer.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionResponse> {
        self.entries.iter()
    }

    pub fn answers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.answer.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<Q: AsRef<str>, A: AsRef<str>> FromIterator<(Q, A)> for ResponseRecord {
    fn from_iter<I: IntoIterator<Item = (Q, A)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (q, a) in iter {
            record.insert(q.as_ref(), a.as_ref());
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let record: ResponseRecord = [("Q2", "b"), ("Q1", "a")].into_iter().collect();
        let questions: Vec<&str> = record.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["Q2", "Q1"]);
    }

    #[test]
    fn second_answer_to_same_question_is_rejected() {
        let mut record = ResponseRecord::new();
        assert!(record.insert("Any falls?", "No"));
        assert!(!record.insert("Any falls?", "Actually yes"));
        assert_eq!(record.answer_for("Any falls?"), Some("No"));
        assert_eq!(record.len(), 1);
    }
}
