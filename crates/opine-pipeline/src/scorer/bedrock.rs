//! Amazon Bedrock `InvokeModel` scorer.
//!
//! Authenticates with a Bedrock API key (`AWS_BEARER_TOKEN_BEDROCK`) as a
//! bearer token, so no request signing is involved.

use async_trait::async_trait;
use opine_core::OpinionScore;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use super::extract::parse_model_response;
use super::{build_prompt, OpinionScorer};
use crate::error::PipelineError;

/// Characters left as-is in the model-ID path segment.
const MODEL_ID_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-').remove(b'_');

#[derive(Serialize)]
struct InvokeRequest<'a> {
    prompt: &'a str,
}

pub struct BedrockScorer {
    client: reqwest::Client,
    invoke_url: String,
    model_id: String,
    api_key: String,
}

impl BedrockScorer {
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: &str, model_id: &str, api_key: &str) -> Self {
        Self {
            client,
            invoke_url: invoke_url(endpoint, model_id),
            model_id: model_id.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

fn invoke_url(endpoint: &str, model_id: &str) -> String {
    format!(
        "{}/model/{}/invoke",
        endpoint.trim_end_matches('/'),
        utf8_percent_encode(model_id, MODEL_ID_SET)
    )
}

#[async_trait]
impl OpinionScorer for BedrockScorer {
    /// # Errors
    ///
    /// - [`PipelineError::Invocation`] on network failure or a non-2xx status.
    /// - Any error from [`parse_model_response`].
    async fn score(&self, text: &str) -> Result<OpinionScore, PipelineError> {
        let prompt = build_prompt(text);

        let response = self
            .client
            .post(&self.invoke_url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&InvokeRequest { prompt: &prompt })
            .send()
            .await
            .map_err(|e| PipelineError::Invocation(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::Invocation(format!("reading response failed: {e}")))?;

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(PipelineError::Invocation(format!(
                "model {} returned status {status}: {snippet}",
                self.model_id
            )));
        }

        tracing::debug!(model = %self.model_id, bytes = body.len(), "model response received");
        parse_model_response(&body)
    }

    fn name(&self) -> &'static str {
        "bedrock"
    }
}
