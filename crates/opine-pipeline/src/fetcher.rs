//! Article download and paragraph text extraction.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::error::PipelineError;

static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("paragraph selector"));

/// Source of article text for a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download `url` and return its visible paragraph text.
    async fn fetch(&self, url: &str) -> Result<String, PipelineError>;
}

/// Plain HTTP GET fetcher. No retry and no caching.
pub struct ArticleFetcher {
    client: reqwest::Client,
}

impl ArticleFetcher {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for ArticleFetcher {
    /// # Errors
    ///
    /// - [`PipelineError::Fetch`] on network failure.
    /// - [`PipelineError::FetchStatus`] on a non-2xx response.
    /// - [`PipelineError::Parse`] if the body cannot be decoded as text.
    async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| PipelineError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| PipelineError::Parse {
            url: url.to_string(),
            reason: format!("body could not be decoded: {e}"),
        })?;

        let text = extract_paragraph_text(&body);
        tracing::info!(url, chars = text.len(), "ingested article");
        Ok(text)
    }
}

/// Concatenate the text of every `<p>` element in document order, one
/// paragraph per line.
///
/// The page is parsed as HTML5, so unclosed paragraphs are recovered the way a
/// browser would and all named entities are decoded. Each paragraph's text is
/// trimmed; inner markup is dropped.
#[must_use]
pub fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
