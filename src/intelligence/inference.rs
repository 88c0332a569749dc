use crate::models::{DetectedSymptoms, ResponseRecord};

use super::detection::SymptomDetector;
use super::reference::ClinicalReference;
use super::types::Inference;

/// Aggregates per-answer detections into symptoms and clinical conditions.
#[derive(Debug, Clone)]
pub struct ConditionInferencer<'a> {
    reference: &'a ClinicalReference,
    detector: &'a SymptomDetector,
}

impl<'a> ConditionInferencer<'a> {
    pub fn new(reference: &'a ClinicalReference, detector: &'a SymptomDetector) -> Self {
        Self {
            reference,
            detector,
        }
    }

    pub fn infer(&self, responses: &ResponseRecord) -> Inference {
        let symptoms = self.detect_symptoms(responses);
        let conditions = self.conditions_for(&symptoms);

        tracing::debug!(
            answers = responses.len(),
            symptoms = ?symptoms.as_slice(),
            conditions = ?conditions,
            "Inference complete"
        );

        Inference {
            symptoms,
            conditions,
        }
    }

    /// Union of positive detections, in catalog order.
    pub fn detect_symptoms(&self, responses: &ResponseRecord) -> DetectedSymptoms {
        let mut symptoms = DetectedSymptoms::new();
        for pattern in self.reference.patterns() {
            if responses
                .answers()
                .any(|answer| self.detector.detect(answer, pattern))
            {
                symptoms.insert(&pattern.id);
            }
        }
        symptoms
    }

    /// Conditions whose required symptoms are all present, in rule order.
    pub fn conditions_for(&self, symptoms: &DetectedSymptoms) -> Vec<String> {
        self.reference
            .rules()
            .iter()
            .filter(|rule| {
                rule.required_symptoms
                    .iter()
                    .all(|required| symptoms.contains(required))
            })
            .map(|rule| {
                self.reference
                    .augmentations()
                    .iter()
                    .fold(rule.condition.clone(), |name, aug| aug.apply(&name, symptoms))
            })
            .collect()
    }
}
