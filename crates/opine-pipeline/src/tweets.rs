//! Twitter/X recent-search source.
//!
//! Calls the v2 `GET /2/tweets/search/recent` endpoint with an app bearer
//! token. Only active when `TWITTER_BEARER_TOKEN` is configured.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::PipelineError;
use crate::types::Document;

/// Bounds the v2 recent-search endpoint accepts for `max_results`.
const MIN_RESULTS: u32 = 10;
const MAX_RESULTS: u32 = 100;

#[async_trait]
pub trait TweetSource: Send + Sync {
    /// Return up to `max_results` recent tweets matching `query`.
    async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<Document>, PipelineError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Deserialize)]
struct Tweet {
    id: String,
    text: String,
}

pub struct TwitterClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str, bearer_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
        }
    }
}

#[async_trait]
impl TweetSource for TwitterClient {
    /// # Errors
    ///
    /// Returns [`PipelineError::Twitter`] on network failure, a non-2xx
    /// status, or an unparseable response body.
    async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<Document>, PipelineError> {
        let url = format!("{}/2/tweets/search/recent", self.base_url);
        let max_results = max_results.clamp(MIN_RESULTS, MAX_RESULTS).to_string();

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[("query", query), ("max_results", max_results.as_str())])
            .send()
            .await
            .map_err(|e| PipelineError::Twitter(format!("search request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PipelineError::Twitter(format!(
                "search returned status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Twitter(format!("search response parse error: {e}")))?;

        let documents: Vec<Document> = body
            .data
            .into_iter()
            .map(|tweet| {
                Document::tweet(
                    format!("https://x.com/i/web/status/{}", tweet.id),
                    tweet.text,
                )
            })
            .collect();

        tracing::info!(query, count = documents.len(), "ingested tweets");
        Ok(documents)
    }
}
