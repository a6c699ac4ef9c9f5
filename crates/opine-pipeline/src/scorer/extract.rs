//! Pulling a JSON object out of free-form model output.

use opine_core::OpinionScore;
use serde_json::Value;

use crate::error::PipelineError;

/// Diagnostic fields copied from the model response onto the extracted score.
const DIAGNOSTIC_KEYS: [&str; 4] = [
    "generation",
    "prompt_token_count",
    "generation_token_count",
    "stop_reason",
];

/// Resolve a parsed model response to the JSON object it carries.
///
/// When the response has a string `generation` field, the substring from its
/// first `{` to its last `}` is parsed and returned. Otherwise the input is
/// returned unchanged.
///
/// # Errors
///
/// Returns [`PipelineError::Extraction`] if the generation contains no
/// `{ ... }` span or the span is not valid JSON.
pub fn extract_json_from_generation(value: Value) -> Result<Value, PipelineError> {
    let Some(generation) = value.get("generation").and_then(Value::as_str) else {
        return Ok(value);
    };

    let (Some(start), Some(end)) = (generation.find('{'), generation.rfind('}')) else {
        return Err(PipelineError::Extraction(
            "no JSON object found in generation".to_string(),
        ));
    };
    if end < start {
        return Err(PipelineError::Extraction(
            "closing brace precedes opening brace".to_string(),
        ));
    }

    serde_json::from_str(&generation[start..=end])
        .map_err(|e| PipelineError::Extraction(format!("embedded JSON is invalid: {e}")))
}

/// Turn a raw response body into a validated [`OpinionScore`].
///
/// # Errors
///
/// - [`PipelineError::MissingBody`] for an empty body.
/// - [`PipelineError::InvalidJson`] if the body is not JSON.
/// - [`PipelineError::Extraction`] from [`extract_json_from_generation`].
/// - [`PipelineError::SchemaValidation`] if the result is not a valid score.
pub fn parse_model_response(body: &str) -> Result<OpinionScore, PipelineError> {
    if body.trim().is_empty() {
        return Err(PipelineError::MissingBody);
    }

    let raw: Value = serde_json::from_str(body).map_err(|source| PipelineError::InvalidJson {
        context: "model response".to_string(),
        source,
    })?;

    let wrapped = raw.get("generation").is_some_and(Value::is_string);
    let mut extracted = extract_json_from_generation(raw.clone())?;

    if wrapped {
        if let (Value::Object(outer), Value::Object(inner)) = (&raw, &mut extracted) {
            for key in DIAGNOSTIC_KEYS {
                if let Some(v) = outer.get(key) {
                    inner.entry(key).or_insert_with(|| v.clone());
                }
            }
        }
    }

    Ok(OpinionScore::from_value(&extracted)?)
}
