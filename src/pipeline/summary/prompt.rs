use crate::intelligence::Inference;
use crate::models::{FallsStatus, ResponseRecord};

/// System-role message for the direct chat-completion call.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a geriatrician providing a professional \
assessment. Your task is to summarize the fall and cognitive history of patients, focusing on \
clinical findings related to Amnesia, Agnosia, Apraxia, Aphasia, and executive function. Use \
precise medical terminology appropriate for clinical documentation.";

const PROMPT_PREAMBLE: &str = "You are a geriatrician. Your task is to draft a summary of the \
fall and cognitive history of the patient for the purpose of diagnosis and to inform further \
medical intervention.\n\nYou have interviewed the caregiver of the elderly patient and here is \
the complete fall and cognitive history that you have collected through the comprehensive \
geriatric assessment:";

const ATTENTION_NOTE: &str = "ATTENTION: Please carefully review the patient responses about \
falls, particularly looking for any indications of recent falls in the past weeks or months, \
even if subtle or indirectly mentioned. Do not rely solely on the detection flags above.";

/// Build the tier-1 prompt: transcript verbatim, the rule-based findings,
/// then the fixed three-line output format.
pub fn build_summary_prompt(responses: &ResponseRecord, inference: &Inference) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(PROMPT_PREAMBLE);
    prompt.push_str("\n\nPATIENT HISTORY (Q&A SESSION):\n");
    for entry in responses.iter() {
        prompt.push_str(&format!("Q: {}\nA: {}\n\n", entry.question, entry.answer));
    }

    prompt.push_str("CLINICAL ANALYSIS:\n");
    let falls = match inference.falls_status() {
        FallsStatus::Concern => "Yes - Patient had falls in the past few weeks",
        FallsStatus::NoConcern => "No",
    };
    prompt.push_str(&format!("Falls detected: {falls}\n"));

    let flagged = if inference.symptoms.is_empty() {
        "None".to_string()
    } else {
        inference.symptoms.iter().collect::<Vec<_>>().join(", ")
    };
    prompt.push_str(&format!("Symptom categories flagged: {flagged}\n\n"));
    prompt.push_str(ATTENTION_NOTE);

    prompt.push_str("\n\nPotential cognitive conditions detected:\n");
    if inference.conditions.is_empty() {
        prompt.push_str("- None identified\n");
    } else {
        for condition in &inference.conditions {
            prompt.push_str(&format!("- {condition}\n"));
        }
    }

    prompt.push_str(
        "\nINSTRUCTIONS:\n\
         Summarise the key findings for fall and cognitive functions such as Amnesia, Agnosia, \
         Apraxia, Aphasia and the elderly's executive function.\n\n\
         Format your assessment as follows:\n\
         1. Falls history: [Concern/No concern with clinical justification]\n\
         2. Cognitive history: [List specific detected conditions or 'No concerns identified']\n\
         3. Be precise and use clinical terminology appropriate for a medical record.\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetectedSymptoms;

    fn money_inference() -> Inference {
        Inference {
            symptoms: ["memory", "executive"].into_iter().collect(),
            conditions: vec![
                "Short term amnesia".into(),
                "Executive dysfunction (complex finances)".into(),
            ],
        }
    }

    #[test]
    fn transcript_is_embedded_verbatim_in_order() {
        let responses: ResponseRecord = [
            ("Any trouble with money or bills?", "Yes, she missed several bill payments"),
            ("Did your mother have any falls recently?", "No falls"),
        ]
        .into_iter()
        .collect();

        let prompt = build_summary_prompt(&responses, &money_inference());
        let money = prompt
            .find("Q: Any trouble with money or bills?\nA: Yes, she missed several bill payments")
            .unwrap();
        let falls = prompt
            .find("Q: Did your mother have any falls recently?\nA: No falls")
            .unwrap();
        assert!(money < falls);
    }

    #[test]
    fn clinical_block_lists_findings() {
        let prompt = build_summary_prompt(&ResponseRecord::new(), &money_inference());
        assert!(prompt.contains("Falls detected: No\n"));
        assert!(prompt.contains("Symptom categories flagged: memory, executive"));
        assert!(prompt.contains("- Executive dysfunction (complex finances)\n"));
    }

    #[test]
    fn no_findings_are_stated_explicitly() {
        let inference = Inference {
            symptoms: DetectedSymptoms::new(),
            conditions: vec![],
        };
        let prompt = build_summary_prompt(&ResponseRecord::new(), &inference);
        assert!(prompt.contains("Symptom categories flagged: None"));
        assert!(prompt.contains("- None identified"));
    }

    #[test]
    fn falls_concern_is_flagged() {
        let inference = Inference {
            symptoms: ["falls"].into_iter().collect(),
            conditions: vec![],
        };
        let prompt = build_summary_prompt(&ResponseRecord::new(), &inference);
        assert!(prompt.contains("Falls detected: Yes"));
    }

    #[test]
    fn output_format_has_three_fixed_items() {
        let prompt = build_summary_prompt(&ResponseRecord::new(), &Inference::default());
        assert!(prompt.contains("1. Falls history:"));
        assert!(prompt.contains("2. Cognitive history:"));
        assert!(prompt.contains("3. Be precise and use clinical terminology"));
    }
}
