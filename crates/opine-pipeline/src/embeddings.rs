//! Sentence embeddings from a Text Embeddings Inference (TEI) server.

use serde::Serialize;

use crate::error::PipelineError;

/// Largest number of inputs sent in one `/embed` request.
const MAX_BATCH: usize = 64;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
    /// Over-long inputs are cut to the model's limit instead of rejected.
    truncate: bool,
}

pub struct TeiClient {
    client: reqwest::Client,
    embed_url: String,
}

impl TeiClient {
    #[must_use]
    pub fn new(client: reqwest::Client, tei_url: &str) -> Self {
        Self {
            client,
            embed_url: format!("{}/embed", tei_url.trim_end_matches('/')),
        }
    }

    /// Embed `texts`, returning one vector per text in input order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Embedding`] if any batch request fails, is
    /// rejected, cannot be parsed, or returns the wrong number of vectors.
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for (batch_index, batch) in texts.chunks(MAX_BATCH).enumerate() {
            vectors.extend(self.embed_batch(batch).await?);
            tracing::debug!(batch = batch_index, size = batch.len(), "embedded batch");
        }
        Ok(vectors)
    }

    async fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let response = self
            .client
            .post(&self.embed_url)
            .json(&EmbedRequest {
                inputs,
                truncate: true,
            })
            .send()
            .await
            .map_err(|e| PipelineError::Embedding(format!("TEI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Embedding(format!(
                "TEI returned status {status}"
            )));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| PipelineError::Embedding(format!("TEI response parse error: {e}")))?;

        check_count(vectors.len(), inputs.len())?;
        Ok(vectors)
    }
}

fn check_count(returned: usize, sent: usize) -> Result<(), PipelineError> {
    if returned == sent {
        Ok(())
    } else {
        Err(PipelineError::Embedding(format!(
            "TEI returned {returned} embeddings for {sent} inputs"
        )))
    }
}
