//! Keyword and negation rules for classifying one free-text answer.
//!
//! A pattern fires when one of its keywords occurs in the answer and the
//! match is not negated. Negation comes from two places:
//! - a pattern negation word within `proximity_window` characters of any
//!   keyword occurrence, and
//! - a catalog phrase ("did not", "no falls", ...) anywhere in the answer.
//!
//! Everything is plain substring search over case-folded text so every
//! decision can be traced back to the catalog.

use crate::config::DEFAULT_NEGATION_WINDOW;
use crate::models::SymptomPattern;

use super::reference::ClinicalReference;
use super::types::{Detection, Negation};

/// Case-fold text for matching. Typographic apostrophes become ASCII so
/// transcribed "didn’t" matches the catalog's "didn't".
pub fn fold_case(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Classifies answers against symptom patterns.
#[derive(Debug, Clone)]
pub struct SymptomDetector {
    negation_phrases: Vec<String>,
    proximity_window: usize,
}

impl SymptomDetector {
    pub fn new(negation_phrases: &[String], proximity_window: usize) -> Self {
        Self {
            negation_phrases: negation_phrases.iter().map(|p| fold_case(p)).collect(),
            proximity_window,
        }
    }

    /// Detector using the reference's phrase catalog.
    pub fn for_reference(reference: &ClinicalReference, proximity_window: usize) -> Self {
        Self::new(reference.negation_phrases(), proximity_window)
    }

    pub fn proximity_window(&self) -> usize {
        self.proximity_window
    }

    /// True iff a keyword matched and neither negation rule fired.
    pub fn detect(&self, text: &str, pattern: &SymptomPattern) -> bool {
        self.detect_with_evidence(text, pattern).is_positive()
    }

    /// Same decision as `detect`, with the terms and negation that led to it.
    pub fn detect_with_evidence(&self, text: &str, pattern: &SymptomPattern) -> Detection {
        let folded = fold_case(text);

        let mut matched_terms = Vec::new();
        let mut keyword_offsets = Vec::new();
        for term in pattern.keywords.iter().chain(&pattern.positive_indicators) {
            let term = fold_case(term);
            let offsets = char_offsets(&folded, &term);
            if !offsets.is_empty() {
                matched_terms.push(term);
                keyword_offsets.extend(offsets);
            }
        }

        if keyword_offsets.is_empty() {
            return Detection {
                symptom: pattern.id.clone(),
                matched_terms,
                negation: None,
            };
        }

        let negation = self
            .proximity_negation(&folded, pattern, &keyword_offsets)
            .or_else(|| self.phrase_negation(&folded));

        Detection {
            symptom: pattern.id.clone(),
            matched_terms,
            negation,
        }
    }

    fn proximity_negation(
        &self,
        folded: &str,
        pattern: &SymptomPattern,
        keyword_offsets: &[usize],
    ) -> Option<Negation> {
        for word in &pattern.negation_words {
            let word = fold_case(word);
            for negation_offset in char_offsets(folded, &word) {
                let nearest = keyword_offsets
                    .iter()
                    .map(|k| k.abs_diff(negation_offset))
                    .min()?;
                if nearest < self.proximity_window {
                    return Some(Negation::Proximity {
                        word,
                        distance: nearest,
                    });
                }
            }
        }
        None
    }

    fn phrase_negation(&self, folded: &str) -> Option<Negation> {
        self.negation_phrases
            .iter()
            .find(|phrase| !phrase.is_empty() && folded.contains(phrase.as_str()))
            .map(|phrase| Negation::Phrase(phrase.clone()))
    }
}

impl Default for SymptomDetector {
    fn default() -> Self {
        Self::for_reference(&ClinicalReference::standard(), DEFAULT_NEGATION_WINDOW)
    }
}

/// Character offsets of every occurrence of `needle`, overlapping ones
/// included (the search resumes one character after each match start).
fn char_offsets(haystack: &str, needle: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    if needle.is_empty() {
        return offsets;
    }

    let mut from = 0;
    let mut chars_before = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let byte = from + pos;
        chars_before += haystack[from..byte].chars().count();
        offsets.push(chars_before);

        let step = haystack[byte..].chars().next().map_or(1, char::len_utf8);
        from = byte + step;
        chars_before += 1;
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> SymptomDetector {
        SymptomDetector::default()
    }

    fn pattern(id: &str) -> SymptomPattern {
        ClinicalReference::standard().pattern(id).unwrap().clone()
    }

    #[test]
    fn plain_keyword_is_detected() {
        assert!(detector().detect("She fell in the garden last week", &pattern("falls")));
    }

    #[test]
    fn no_keyword_is_not_a_finding() {
        let detection = detector().detect_with_evidence("She has been fine", &pattern("falls"));
        assert!(!detection.is_positive());
        assert!(detection.matched_terms.is_empty());
        assert!(detection.negation.is_none());
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(detector().detect("She FELL twice", &pattern("falls")));
        assert!(detector().detect("She gets confused at the ATM", &pattern("executive")));
    }

    #[test]
    fn negation_word_near_keyword_negates() {
        let detection = detector().detect_with_evidence("Never fell at all", &pattern("falls"));
        assert!(!detection.is_positive());
        assert_eq!(
            detection.negation,
            Some(Negation::Proximity {
                word: "never".into(),
                distance: 6
            })
        );
    }

    #[test]
    fn distant_negation_word_does_not_negate() {
        // "not" sits far from "fell"; no phrase in the catalog appears.
        let text = "She is not sleeping well at night and last month she fell in the kitchen";
        assert!(detector().detect(text, &pattern("falls")));
    }

    #[test]
    fn window_is_strict() {
        // "no" at 0, "fall" at 15: distance equals the window.
        let text = "no worries but fall";
        assert_eq!(text.find("fall"), Some(15));
        assert!(detector().detect(text, &pattern("falls")));

        let narrower = SymptomDetector::new(&[], 16);
        assert!(!narrower.detect(text, &pattern("falls")));
    }

    #[test]
    fn negation_just_past_window_is_ignored() {
        let text = "No trouble with money";
        assert_eq!(text.find("money"), Some(16));
        let detection = detector().detect_with_evidence(text, &pattern("executive"));
        assert!(detection.is_positive());
        assert!(detection.negation.is_none());
    }

    #[test]
    fn know_who_is_negated_by_its_own_letters() {
        let detection = detector()
            .detect_with_evidence("Some days she will know who we are", &pattern("recognition"));
        assert!(!detection.is_positive());
        assert_eq!(detection.matched_terms, vec!["know who".to_string()]);
        assert_eq!(
            detection.negation,
            Some(Negation::Proximity {
                word: "no".into(),
                distance: 1
            })
        );
    }

    #[test]
    fn window_is_configurable() {
        let text = "no, though she did fall";
        assert!(!SymptomDetector::new(&[], 20).detect(text, &pattern("falls")));
        assert!(SymptomDetector::new(&[], 10).detect(text, &pattern("falls")));
    }

    #[test]
    fn negation_phrase_negates_regardless_of_distance() {
        let text = "No falls, she has been fine";
        let detection = detector().detect_with_evidence(text, &pattern("falls"));
        assert!(!detection.is_positive());

        let far = "She tripped over the rug in the hallway a few weeks ago but has not had any since";
        let detection = detector().detect_with_evidence(far, &pattern("falls"));
        assert_eq!(detection.negation, Some(Negation::Phrase("has not".into())));
    }

    #[test]
    fn every_keyword_occurrence_is_checked() {
        // First "fall" is far from "never"; the second is right next to it.
        let text = "A fall is what I worried about, but she never fall over";
        assert!(!detector().detect(text, &pattern("falls")));
    }

    #[test]
    fn every_negation_occurrence_is_checked() {
        // First "no" is far away; the second one sits beside the keyword.
        let text = "no idea about sleep, and absolutely no memory problems";
        assert!(!detector().detect(text, &pattern("memory")));
    }

    #[test]
    fn typographic_apostrophe_is_folded() {
        assert!(!detector().detect("She didn’t forget anything", &pattern("memory")));
    }

    #[test]
    fn positive_indicators_count_as_evidence() {
        let pattern = SymptomPattern::new("falls", &["fell"], &["no"])
            .with_positive_indicators(&["on the floor"]);
        let detection = detector().detect_with_evidence("I found her on the floor", &pattern);
        assert!(detection.is_positive());
        assert_eq!(detection.matched_terms, vec!["on the floor".to_string()]);
    }

    #[test]
    fn char_offsets_counts_characters_not_bytes() {
        assert_eq!(char_offsets("été fall", "fall"), vec![4]);
        assert_eq!(char_offsets("aaa", "aa"), vec![0, 1]);
        assert!(char_offsets("abc", "").is_empty());
    }

    #[test]
    fn money_scenario_detects_executive_and_memory() {
        let text = "Yes, she missed several bill payments and gets confused with the ATM";
        assert!(detector().detect(text, &pattern("executive")));
        assert!(detector().detect(text, &pattern("memory")));
        assert!(!detector().detect(text, &pattern("falls")));
    }
}
