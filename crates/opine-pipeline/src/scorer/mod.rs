//! Opinion scoring: prompt construction and the scorer implementations.

mod bedrock;
mod extract;

use async_trait::async_trait;
use opine_core::OpinionScore;

use crate::error::PipelineError;

pub use bedrock::BedrockScorer;
pub use extract::{extract_json_from_generation, parse_model_response};

/// Produces an [`OpinionScore`] for one document.
#[async_trait]
pub trait OpinionScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<OpinionScore, PipelineError>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}

/// Instruction sent to the model for `text`.
#[must_use]
pub fn build_prompt(text: &str) -> String {
    format!(
        "Analyze the following text regarding work-life balance. \
         Return a JSON object with exactly these keys: \
         \"work_flexibility\", \"burnout_risk\", \"remote_work_appeal\", \
         \"productivity_impact\", \"overall_sentiment\". \
         Each value must be an integer between 1 and 5. \
         Text: \"{text}\""
    )
}

/// Fixed-score stand-in for offline runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedScorer;

impl SimulatedScorer {
    /// The score every document receives.
    #[must_use]
    pub fn fixed_score() -> OpinionScore {
        OpinionScore {
            work_flexibility: 4,
            burnout_risk: 2,
            remote_work_appeal: 5,
            productivity_impact: 4,
            overall_sentiment: 4,
            source: None,
            generation: None,
            prompt_token_count: None,
            generation_token_count: None,
            stop_reason: None,
        }
    }
}

#[async_trait]
impl OpinionScorer for SimulatedScorer {
    async fn score(&self, _text: &str) -> Result<OpinionScore, PipelineError> {
        Ok(Self::fixed_score())
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use opine_core::METRIC_KEYS;

    use super::*;

    #[test]
    fn prompt_names_every_metric_and_embeds_text() {
        let prompt = build_prompt("Long hours lead to burnout.");
        for key in METRIC_KEYS {
            assert!(prompt.contains(&format!("\"{key}\"")), "prompt missing {key}");
        }
        assert!(prompt.contains("between 1 and 5"));
        assert!(prompt.ends_with("Text: \"Long hours lead to burnout.\""));
    }

    #[tokio::test]
    async fn simulated_scorer_returns_valid_fixed_score() {
        let score = SimulatedScorer
            .score("Remote work offers flexibility, but long hours may lead to burnout.")
            .await
            .unwrap();
        for (key, value) in score.metrics() {
            assert!((1..=5).contains(&value), "{key} out of range: {value}");
        }
        assert_eq!(score, SimulatedScorer::fixed_score());
        assert_eq!(SimulatedScorer.name(), "simulated");
    }
}
