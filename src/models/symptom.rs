use serde::{Deserialize, Serialize};

/// Keyword rules for one clinical indicator (falls, memory, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomPattern {
    pub id: String,
    pub keywords: Vec<String>,
    pub negation_words: Vec<String>,
    /// Extra affirmative terms. When present they count as keyword evidence.
    #[serde(default)]
    pub positive_indicators: Vec<String>,
}

impl SymptomPattern {
    pub fn new(id: &str, keywords: &[&str], negation_words: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            negation_words: negation_words.iter().map(|n| n.to_string()).collect(),
            positive_indicators: Vec::new(),
        }
    }

    pub fn with_positive_indicators(mut self, indicators: &[&str]) -> Self {
        self.positive_indicators = indicators.iter().map(|i| i.to_string()).collect();
        self
    }
}

/// A named condition that fires when every required symptom is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionRule {
    pub condition: String,
    pub required_symptoms: Vec<String>,
}

impl ConditionRule {
    pub fn new(condition: &str, required_symptoms: &[&str]) -> Self {
        Self {
            condition: condition.to_string(),
            required_symptoms: required_symptoms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Display rewrite: when `condition` fired and `symptom` was detected,
/// the condition is shown as `"{condition} ({qualifier})"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionAugmentation {
    pub condition: String,
    pub symptom: String,
    pub qualifier: String,
}

impl ConditionAugmentation {
    /// Apply the rewrite to a display name. Idempotent.
    pub fn apply(&self, name: &str, symptoms: &DetectedSymptoms) -> String {
        if name != self.condition || !symptoms.contains(&self.symptom) {
            return name.to_string();
        }
        format!("{} ({})", self.condition, self.qualifier)
    }
}

/// Symptom ids found across an interview, in catalog order, no duplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectedSymptoms(Vec<String>);

impl DetectedSymptoms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add an id; returns false when it was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s == id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> FromIterator<&'a str> for DetectedSymptoms {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
