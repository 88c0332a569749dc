use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::{AssessmentConfig, SummaryMode};
use crate::intelligence::{ClinicalReference, ConditionInferencer, Inference, SymptomDetector};
use crate::models::{Provenance, ResponseRecord, Summary};

use super::client::{DisabledSummaryClient, SummaryClient};
use super::fallback::compose_fallback;
use super::openai::OpenAiSummaryClient;
use super::prompt::build_summary_prompt;
use super::proxy::ProxySummaryClient;
use super::SummaryError;

/// Two-tier summary generator. Shared across sessions behind an `Arc`.
pub struct SummaryGenerator {
    client: Arc<dyn SummaryClient>,
    reference: Arc<ClinicalReference>,
    detector: SymptomDetector,
    timeout: Duration,
}

impl SummaryGenerator {
    pub fn new(
        client: Arc<dyn SummaryClient>,
        reference: Arc<ClinicalReference>,
        negation_window: usize,
        timeout: Duration,
    ) -> Self {
        let detector = SymptomDetector::for_reference(&reference, negation_window);
        Self {
            client,
            reference,
            detector,
            timeout,
        }
    }

    /// Pick the remote collaborator named by `config.summary_mode`.
    pub fn from_config(
        config: &AssessmentConfig,
        reference: Arc<ClinicalReference>,
    ) -> Result<Self, SummaryError> {
        let timeout_secs = config.summary_timeout.as_secs().max(1);
        let client: Arc<dyn SummaryClient> = match config.summary_mode {
            SummaryMode::Proxy => Arc::new(ProxySummaryClient::new(&config.proxy_url, timeout_secs)?),
            SummaryMode::Direct => Arc::new(OpenAiSummaryClient::new(
                &config.openai_url,
                config.openai_api_key.clone(),
                timeout_secs,
            )?),
            SummaryMode::Off => Arc::new(DisabledSummaryClient),
        };

        tracing::info!(
            client = client.name(),
            timeout_secs,
            negation_window = config.negation_window,
            "Summary generator configured"
        );

        Ok(Self::new(
            client,
            reference,
            config.negation_window,
            config.summary_timeout,
        ))
    }

    pub fn reference(&self) -> &ClinicalReference {
        &self.reference
    }

    pub fn detector(&self) -> &SymptomDetector {
        &self.detector
    }

    pub fn inference(&self, responses: &ResponseRecord) -> Inference {
        ConditionInferencer::new(&self.reference, &self.detector).infer(responses)
    }

    /// Tier 2 only. Used by the `analyze` command and as the error boundary.
    pub fn fallback(&self, responses: &ResponseRecord) -> Summary {
        compose_fallback(&self.inference(responses))
    }

    /// Produce a summary. Tries the remote collaborator once, bounded by the
    /// configured timeout, and composes the fallback on any failure.
    pub async fn generate(&self, responses: &ResponseRecord) -> Summary {
        let inference = self.inference(responses);
        let prompt = build_summary_prompt(responses, &inference);

        let attempt = tokio::time::timeout(self.timeout, self.client.generate(&prompt)).await;
        let error = match attempt {
            Ok(Ok(body)) => {
                tracing::info!(
                    client = self.client.name(),
                    provenance = %Provenance::Remote,
                    conditions = inference.conditions.len(),
                    "Summary generated"
                );
                return Summary {
                    falls: inference.falls_status(),
                    conditions: inference.conditions,
                    provenance: Provenance::Remote,
                    body,
                    generated_at: Utc::now(),
                };
            }
            Ok(Err(e)) => e,
            Err(_) => SummaryError::Timeout(self.timeout.as_secs()),
        };

        match &error {
            SummaryError::Disabled => {
                tracing::debug!("Remote summary disabled, composing fallback");
            }
            SummaryError::MissingCredential => {
                tracing::warn!(
                    client = self.client.name(),
                    setting = "OPENAI_API_KEY",
                    "Remote summary not configured, composing fallback"
                );
            }
            e => {
                tracing::warn!(
                    client = self.client.name(),
                    error = %e,
                    "Remote summary failed, composing fallback"
                );
            }
        }

        let summary = compose_fallback(&inference);
        tracing::info!(
            provenance = %summary.provenance,
            conditions = summary.conditions.len(),
            "Summary generated"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FallsStatus;
    use crate::pipeline::summary::MockSummaryClient;

    fn generator(client: Arc<dyn SummaryClient>) -> SummaryGenerator {
        SummaryGenerator::new(
            client,
            Arc::new(ClinicalReference::standard()),
            15,
            Duration::from_secs(5),
        )
    }

    fn falls_fine() -> ResponseRecord {
        [("Did your mother have any falls recently?", "No falls, she has been fine")]
            .into_iter()
            .collect()
    }

    fn money_trouble() -> ResponseRecord {
        [(
            "Any trouble with money or bills?",
            "Yes, she missed several bill payments and gets confused with the ATM",
        )]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn remote_success_is_used_verbatim() {
        let client = Arc::new(MockSummaryClient::new(
            "1. Falls history: No concern\n2. Cognitive history: No concerns identified",
        ));
        let summary = generator(client.clone()).generate(&falls_fine()).await;

        assert_eq!(summary.provenance, Provenance::Remote);
        assert!(summary.body.starts_with("1. Falls history"));
        assert_eq!(summary.falls, FallsStatus::NoConcern);
        assert_eq!(client.calls(), 1);
        assert!(client.prompts()[0].contains("A: No falls, she has been fine"));
    }

    #[tokio::test]
    async fn always_failing_remote_yields_fallback() {
        let errors = [
            SummaryError::Connection("http://localhost:3001".into()),
            SummaryError::Upstream {
                status: 502,
                body: "bad gateway".into(),
            },
            SummaryError::MalformedResponse("eof".into()),
            SummaryError::EmptySummary,
            SummaryError::MissingCredential,
            SummaryError::Disabled,
        ];
        for error in errors {
            let summary = generator(Arc::new(MockSummaryClient::failing(error)))
                .generate(&money_trouble())
                .await;
            assert_eq!(summary.provenance, Provenance::Fallback);
            assert!(!summary.body.is_empty());
        }
    }

    #[tokio::test]
    async fn no_falls_scenario_fallback_text() {
        let summary = generator(Arc::new(DisabledSummaryClient))
            .generate(&falls_fine())
            .await;
        assert_eq!(
            summary.body,
            "Falls history: No concern\n\nCognitive history: No concerns identified"
        );
    }

    #[tokio::test]
    async fn money_scenario_fallback_names_complex_finances() {
        let summary = generator(Arc::new(MockSummaryClient::failing(SummaryError::EmptySummary)))
            .generate(&money_trouble())
            .await;
        assert!(summary
            .cognitive_line()
            .contains("Executive dysfunction (complex finances)"));
        assert_eq!(
            summary.body,
            "Falls history: No concern\n\nCognitive history: Short term amnesia, Executive dysfunction (complex finances)"
        );
    }

    #[tokio::test]
    async fn slow_remote_times_out_into_fallback() {
        let client = Arc::new(MockSummaryClient::new("late").with_delay(Duration::from_secs(10)));
        let generator = SummaryGenerator::new(
            client,
            Arc::new(ClinicalReference::standard()),
            15,
            Duration::from_millis(50),
        );
        let summary = generator.generate(&falls_fine()).await;
        assert_eq!(summary.provenance, Provenance::Fallback);
    }

    #[tokio::test]
    async fn remote_summary_keeps_rule_based_conditions() {
        let summary = generator(Arc::new(MockSummaryClient::new("Free text")))
            .generate(&money_trouble())
            .await;
        assert_eq!(summary.provenance, Provenance::Remote);
        assert_eq!(summary.body, "Free text");
        assert_eq!(
            summary.conditions,
            vec![
                "Short term amnesia".to_string(),
                "Executive dysfunction (complex finances)".to_string()
            ]
        );
    }

    #[test]
    fn from_config_off_mode() {
        let config = AssessmentConfig {
            summary_mode: SummaryMode::Off,
            ..AssessmentConfig::default()
        };
        let generator =
            SummaryGenerator::from_config(&config, Arc::new(ClinicalReference::standard())).unwrap();
        assert_eq!(generator.client.name(), "disabled");
        assert_eq!(generator.detector().proximity_window(), 15);
    }

    #[test]
    fn fallback_is_synchronous() {
        let summary = generator(Arc::new(DisabledSummaryClient)).fallback(&ResponseRecord::new());
        assert_eq!(summary.provenance, Provenance::Fallback);
    }
}
