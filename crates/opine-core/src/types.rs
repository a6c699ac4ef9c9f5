//! Opinion score records and the persisted pipeline output.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The five required metric keys, in canonical order.
pub const METRIC_KEYS: [&str; 5] = [
    "work_flexibility",
    "burnout_risk",
    "remote_work_appeal",
    "productivity_impact",
    "overall_sentiment",
];

/// Optional passthrough keys tolerated next to the metrics.
const PASSTHROUGH_KEYS: [&str; 5] = [
    "source",
    "generation",
    "prompt_token_count",
    "generation_token_count",
    "stop_reason",
];

const MIN_SCORE: i64 = 1;
const MAX_SCORE: i64 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ScoreValidationError {
    #[error("opinion score must be a JSON object")]
    NotAnObject,

    #[error("missing required key \"{0}\"")]
    MissingKey(&'static str),

    #[error("value for \"{key}\" is not an integer: {value}")]
    NotAnInteger { key: &'static str, value: Value },

    #[error("value for \"{key}\" is outside 1..=5: {value}")]
    OutOfRange { key: &'static str, value: Value },

    #[error("unexpected key \"{0}\"")]
    UnexpectedKey(String),
}

/// A validated five-field opinion rating for one document.
///
/// Deserialization runs the same checks as [`OpinionScore::from_value`], so a
/// value of this type always holds in-range metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct OpinionScore {
    pub work_flexibility: u8,
    pub burnout_risk: u8,
    pub remote_work_appeal: u8,
    pub productivity_impact: u8,
    pub overall_sentiment: u8,

    /// Provenance URL of the scored document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Raw model text the score was extracted from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_token_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl OpinionScore {
    /// Build a score from the five metrics with no passthrough fields.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreValidationError::OutOfRange`] if any metric is outside 1..=5.
    pub fn new(
        work_flexibility: u8,
        burnout_risk: u8,
        remote_work_appeal: u8,
        productivity_impact: u8,
        overall_sentiment: u8,
    ) -> Result<Self, ScoreValidationError> {
        let score = Self {
            work_flexibility,
            burnout_risk,
            remote_work_appeal,
            productivity_impact,
            overall_sentiment,
            source: None,
            generation: None,
            prompt_token_count: None,
            generation_token_count: None,
            stop_reason: None,
        };
        for (key, value) in score.metrics() {
            if !(MIN_SCORE..=MAX_SCORE).contains(&i64::from(value)) {
                return Err(ScoreValidationError::OutOfRange {
                    key,
                    value: Value::from(value),
                });
            }
        }
        Ok(score)
    }

    /// Validate a JSON value and convert it into an `OpinionScore`.
    ///
    /// Every key in [`METRIC_KEYS`] must be present with an integer in 1..=5.
    /// Besides the metrics only the passthrough keys (`source`, `generation`,
    /// `prompt_token_count`, `generation_token_count`, `stop_reason`) are
    /// accepted; passthrough values of the wrong type are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScoreValidationError`] found.
    pub fn from_value(value: &Value) -> Result<Self, ScoreValidationError> {
        let Value::Object(map) = value else {
            return Err(ScoreValidationError::NotAnObject);
        };

        if let Some(key) = map.keys().find(|k| {
            !METRIC_KEYS.contains(&k.as_str()) && !PASSTHROUGH_KEYS.contains(&k.as_str())
        }) {
            return Err(ScoreValidationError::UnexpectedKey(key.clone()));
        }

        let metric = |key: &'static str| -> Result<u8, ScoreValidationError> {
            let raw = map.get(key).ok_or(ScoreValidationError::MissingKey(key))?;
            if !(raw.is_i64() || raw.is_u64()) {
                return Err(ScoreValidationError::NotAnInteger {
                    key,
                    value: raw.clone(),
                });
            }
            raw.as_i64()
                .filter(|n| (MIN_SCORE..=MAX_SCORE).contains(n))
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| ScoreValidationError::OutOfRange {
                    key,
                    value: raw.clone(),
                })
        };

        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        let count = |key: &str| map.get(key).and_then(Value::as_u64);

        Ok(Self {
            work_flexibility: metric("work_flexibility")?,
            burnout_risk: metric("burnout_risk")?,
            remote_work_appeal: metric("remote_work_appeal")?,
            productivity_impact: metric("productivity_impact")?,
            overall_sentiment: metric("overall_sentiment")?,
            source: text("source"),
            generation: text("generation"),
            prompt_token_count: count("prompt_token_count"),
            generation_token_count: count("generation_token_count"),
            stop_reason: text("stop_reason"),
        })
    }

    /// The five metrics in canonical order.
    #[must_use]
    pub fn metrics(&self) -> [(&'static str, u8); 5] {
        [
            (METRIC_KEYS[0], self.work_flexibility),
            (METRIC_KEYS[1], self.burnout_risk),
            (METRIC_KEYS[2], self.remote_work_appeal),
            (METRIC_KEYS[3], self.productivity_impact),
            (METRIC_KEYS[4], self.overall_sentiment),
        ]
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl TryFrom<Value> for OpinionScore {
    type Error = ScoreValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// A document whose scoring failed; recorded instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFailure {
    pub source: String,
    pub error: String,
}

/// Number of documents that made it through one pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMetric {
    pub stage: String,
    pub documents: usize,
    /// Mean `overall_sentiment` of the documents scored in this stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_sentiment: Option<f64>,
}

/// On-disk contract between the scoring and reporting stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    #[serde(default)]
    pub articles: Vec<OpinionScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tweets: Vec<OpinionScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ScoreFailure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<StageMetric>,
}

impl PipelineOutput {
    #[must_use]
    pub fn from_articles(articles: Vec<OpinionScore>) -> Self {
        Self {
            articles,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid() -> Value {
        json!({
            "work_flexibility": 4,
            "burnout_risk": 2,
            "remote_work_appeal": 5,
            "productivity_impact": 4,
            "overall_sentiment": 4
        })
    }

    #[test]
    fn from_value_accepts_five_in_range_integers() {
        let score = OpinionScore::from_value(&valid()).unwrap();
        assert_eq!(
            score.metrics(),
            [
                ("work_flexibility", 4),
                ("burnout_risk", 2),
                ("remote_work_appeal", 5),
                ("productivity_impact", 4),
                ("overall_sentiment", 4),
            ]
        );
        assert!(score.generation.is_none());
    }

    #[test]
    fn from_value_accepts_range_bounds() {
        let value = json!({
            "work_flexibility": 1,
            "burnout_risk": 5,
            "remote_work_appeal": 1,
            "productivity_impact": 5,
            "overall_sentiment": 3
        });
        assert!(OpinionScore::from_value(&value).is_ok());
    }

    #[test]
    fn from_value_rejects_missing_key() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("burnout_risk");
        assert_eq!(
            OpinionScore::from_value(&value),
            Err(ScoreValidationError::MissingKey("burnout_risk"))
        );
    }

    #[test]
    fn from_value_rejects_out_of_range() {
        for bad in [0, 6, -1] {
            let mut value = valid();
            value["overall_sentiment"] = json!(bad);
            let err = OpinionScore::from_value(&value).unwrap_err();
            assert!(
                matches!(err, ScoreValidationError::OutOfRange { key: "overall_sentiment", .. }),
                "expected OutOfRange for {bad}, got {err:?}"
            );
        }
    }

    #[test]
    fn from_value_rejects_non_integers() {
        for bad in [json!(4.5), json!("4"), json!(null), json!(true)] {
            let mut value = valid();
            value["work_flexibility"] = bad.clone();
            let err = OpinionScore::from_value(&value).unwrap_err();
            assert!(
                matches!(err, ScoreValidationError::NotAnInteger { key: "work_flexibility", .. }),
                "expected NotAnInteger for {bad}, got {err:?}"
            );
        }
    }

    #[test]
    fn from_value_rejects_unexpected_key() {
        let mut value = valid();
        value["explanation"] = json!("because");
        assert_eq!(
            OpinionScore::from_value(&value),
            Err(ScoreValidationError::UnexpectedKey("explanation".to_string()))
        );
    }

    #[test]
    fn from_value_rejects_non_object() {
        assert_eq!(
            OpinionScore::from_value(&json!([1, 2, 3])),
            Err(ScoreValidationError::NotAnObject)
        );
    }

    #[test]
    fn from_value_keeps_diagnostics() {
        let mut value = valid();
        value["generation"] = json!("{\"work_flexibility\": 4}");
        value["prompt_token_count"] = json!(120);
        value["generation_token_count"] = json!(40);
        value["stop_reason"] = json!("stop");
        let score = OpinionScore::from_value(&value).unwrap();
        assert_eq!(score.prompt_token_count, Some(120));
        assert_eq!(score.generation_token_count, Some(40));
        assert_eq!(score.stop_reason.as_deref(), Some("stop"));
        assert!(score.generation.is_some());
    }

    #[test]
    fn serialize_omits_absent_passthrough_fields() {
        let score = OpinionScore::from_value(&valid()).unwrap();
        assert_eq!(serde_json::to_value(&score).unwrap(), valid());
    }

    #[test]
    fn deserialize_enforces_range() {
        let mut value = valid();
        value["burnout_risk"] = json!(9);
        assert!(serde_json::from_value::<OpinionScore>(value).is_err());
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(OpinionScore::new(4, 2, 5, 4, 4).is_ok());
        assert!(matches!(
            OpinionScore::new(4, 0, 5, 4, 4),
            Err(ScoreValidationError::OutOfRange { key: "burnout_risk", .. })
        ));
    }

    #[test]
    fn pipeline_output_omits_empty_optional_sections() {
        let output = PipelineOutput::from_articles(vec![OpinionScore::from_value(&valid()).unwrap()]);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value, json!({ "articles": [valid()] }));
    }

    #[test]
    fn pipeline_output_reads_articles_only_file() {
        let raw = json!({ "articles": [valid()] }).to_string();
        let output: PipelineOutput = serde_json::from_str(&raw).unwrap();
        assert_eq!(output.articles.len(), 1);
        assert!(output.tweets.is_empty());
        assert!(output.failures.is_empty());
        assert!(output.stages.is_empty());
    }
}
