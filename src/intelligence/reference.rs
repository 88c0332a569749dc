use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::detection::fold_case;
use super::types::ReferenceError;
use crate::models::{ConditionAugmentation, ConditionRule, SymptomPattern};

const STANDARD_NEGATIONS: &[&str] = &["no", "not", "didn't", "never", "normal"];

/// Phrases that negate a whole answer regardless of where they appear.
const STANDARD_NEGATION_PHRASES: &[&str] = &[
    "did not",
    "didn't",
    "has not",
    "hasn't",
    "does not",
    "doesn't",
    "no falls",
    "no history",
    "not had",
    "never had",
];

/// Symptom catalog, condition table and negation phrases, validated and
/// case-folded once at load time. Immutable afterwards and cheap to share
/// behind an `Arc` across sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicalReference {
    patterns: Vec<SymptomPattern>,
    rules: Vec<ConditionRule>,
    augmentations: Vec<ConditionAugmentation>,
    negation_phrases: Vec<String>,
}

impl ClinicalReference {
    pub fn new(
        patterns: Vec<SymptomPattern>,
        rules: Vec<ConditionRule>,
        augmentations: Vec<ConditionAugmentation>,
        negation_phrases: Vec<String>,
    ) -> Result<Self, ReferenceError> {
        let reference = Self {
            patterns: patterns.into_iter().map(fold_pattern).collect(),
            rules,
            augmentations,
            negation_phrases: fold_terms(&negation_phrases),
        };
        reference.validate()?;
        Ok(reference)
    }

    /// The deployment catalog for the falls and cognitive interview.
    pub fn standard() -> Self {
        let patterns = vec![
            SymptomPattern::new(
                "falls",
                &[
                    "fall", "fell", "falling", "fallen", "tripped", "collapsed", "falls",
                    // speech recognition hears "falls" as "false" often enough to matter
                    "false",
                ],
                &["no", "not", "didn't", "never", "hasn't"],
            ),
            SymptomPattern::new(
                "memory",
                &["forget", "memory", "remember", "confused", "confusion"],
                STANDARD_NEGATIONS,
            ),
            // "know who" contains "no", so that keyword always negates itself.
            SymptomPattern::new(
                "recognition",
                &["recognize", "recognise", "identify", "familiar", "know who"],
                STANDARD_NEGATIONS,
            ),
            SymptomPattern::new(
                "language",
                &["word", "speak", "talk", "language", "communicate", "speech", "express"],
                STANDARD_NEGATIONS,
            ),
            SymptomPattern::new(
                "executive",
                &["money", "finances", "bills", "ATM", "banking", "financial", "budget"],
                STANDARD_NEGATIONS,
            ),
        ];

        let rules = vec![
            ConditionRule::new("Short term amnesia", &["memory"]),
            ConditionRule::new("Agnosia", &["recognition"]),
            ConditionRule::new("Aphasia", &["language"]),
            ConditionRule::new("Executive dysfunction", &["executive"]),
        ];

        let augmentations = vec![ConditionAugmentation {
            condition: "Executive dysfunction".into(),
            symptom: "executive".into(),
            qualifier: "complex finances".into(),
        }];

        let phrases = STANDARD_NEGATION_PHRASES.iter().map(|p| p.to_string()).collect();

        // The built-in tables are covered by `standard_reference_is_valid`.
        Self {
            patterns: patterns.into_iter().map(fold_pattern).collect(),
            rules,
            augmentations,
            negation_phrases: phrases,
        }
    }

    /// Load a catalog from a JSON file with the same shape as this struct.
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ReferenceError::Load(path.display().to_string(), e.to_string()))?;
        let raw: ClinicalReference = serde_json::from_str(&json)
            .map_err(|e| ReferenceError::Parse(path.display().to_string(), e.to_string()))?;
        Self::new(raw.patterns, raw.rules, raw.augmentations, raw.negation_phrases)
    }

    pub fn patterns(&self) -> &[SymptomPattern] {
        &self.patterns
    }

    pub fn pattern(&self, id: &str) -> Option<&SymptomPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn rules(&self) -> &[ConditionRule] {
        &self.rules
    }

    pub fn augmentations(&self) -> &[ConditionAugmentation] {
        &self.augmentations
    }

    pub fn negation_phrases(&self) -> &[String] {
        &self.negation_phrases
    }

    pub fn validate(&self) -> Result<(), ReferenceError> {
        let mut ids = HashSet::new();
        for pattern in &self.patterns {
            if pattern.id.trim().is_empty() {
                return Err(ReferenceError::EmptySymptomId);
            }
            if !ids.insert(pattern.id.as_str()) {
                return Err(ReferenceError::DuplicateSymptom(pattern.id.clone()));
            }
            if pattern.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ReferenceError::NoKeywords(pattern.id.clone()));
            }
        }

        for rule in &self.rules {
            if rule.required_symptoms.is_empty() {
                return Err(ReferenceError::EmptyRule(rule.condition.clone()));
            }
            if let Some(unknown) = rule
                .required_symptoms
                .iter()
                .find(|s| !ids.contains(s.as_str()))
            {
                return Err(ReferenceError::UnknownSymptom {
                    owner: rule.condition.clone(),
                    symptom: unknown.clone(),
                });
            }
        }

        for aug in &self.augmentations {
            if !ids.contains(aug.symptom.as_str()) {
                return Err(ReferenceError::UnknownSymptom {
                    owner: aug.condition.clone(),
                    symptom: aug.symptom.clone(),
                });
            }
            if !self.rules.iter().any(|r| r.condition == aug.condition) {
                return Err(ReferenceError::UnknownCondition(aug.condition.clone()));
            }
        }

        Ok(())
    }
}

impl Default for ClinicalReference {
    fn default() -> Self {
        Self::standard()
    }
}

fn fold_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| fold_case(t.trim()))
        .filter(|t| !t.is_empty())
        .collect()
}

fn fold_pattern(pattern: SymptomPattern) -> SymptomPattern {
    SymptomPattern {
        id: pattern.id,
        keywords: fold_terms(&pattern.keywords),
        negation_words: fold_terms(&pattern.negation_words),
        positive_indicators: fold_terms(&pattern.positive_indicators),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_reference_is_valid() {
        ClinicalReference::standard().validate().unwrap();
    }

    #[test]
    fn standard_catalog_order() {
        let reference = ClinicalReference::standard();
        let ids: Vec<&str> = reference.patterns().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["falls", "memory", "recognition", "language", "executive"]);
    }

    #[test]
    fn keywords_are_case_folded() {
        let reference = ClinicalReference::standard();
        let executive = reference.pattern("executive").unwrap();
        assert!(executive.keywords.contains(&"atm".to_string()));
        assert!(!executive.keywords.contains(&"ATM".to_string()));
    }

    #[test]
    fn duplicate_symptom_rejected() {
        let err = ClinicalReference::new(
            vec![
                SymptomPattern::new("memory", &["forget"], &["no"]),
                SymptomPattern::new("memory", &["remember"], &["no"]),
            ],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceError::DuplicateSymptom(id) if id == "memory"));
    }

    #[test]
    fn rule_with_unknown_symptom_rejected() {
        let err = ClinicalReference::new(
            vec![SymptomPattern::new("memory", &["forget"], &["no"])],
            vec![ConditionRule::new("Apraxia", &["motor"])],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceError::UnknownSymptom { symptom, .. } if symptom == "motor"));
    }

    #[test]
    fn pattern_without_keywords_rejected() {
        let err = ClinicalReference::new(
            vec![SymptomPattern::new("memory", &[" "], &["no"])],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceError::NoKeywords(_)));
    }

    #[test]
    fn augmentation_for_missing_condition_rejected() {
        let err = ClinicalReference::new(
            vec![SymptomPattern::new("executive", &["money"], &["no"])],
            vec![],
            vec![ConditionAugmentation {
                condition: "Executive dysfunction".into(),
                symptom: "executive".into(),
                qualifier: "complex finances".into(),
            }],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceError::UnknownCondition(_)));
    }

    #[test]
    fn load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.json");
        let json = serde_json::to_string(&ClinicalReference::standard()).unwrap();
        std::fs::write(&path, json).unwrap();

        let loaded = ClinicalReference::load(&path).unwrap();
        assert_eq!(loaded, ClinicalReference::standard());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ClinicalReference::load(Path::new("/nonexistent/reference.json")).unwrap_err();
        assert!(matches!(err, ReferenceError::Load(..)));
    }
}
