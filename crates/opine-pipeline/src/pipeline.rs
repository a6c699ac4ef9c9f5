//! Pipeline orchestration.

use opine_core::{OpinionScore, PipelineOutput, ScoreFailure, StageMetric};

use crate::error::PipelineError;
use crate::fetcher::Fetcher;
use crate::persist;
use crate::scorer::OpinionScorer;
use crate::tweets::TweetSource;
use crate::types::{Document, DocumentKind, RunRequest, RunSummary};
use crate::vector_store::DocumentStore;

/// Service handles for one run. Every handle is owned by the caller.
pub struct Pipeline<'a> {
    fetcher: &'a dyn Fetcher,
    scorer: &'a dyn OpinionScorer,
    tweets: Option<&'a dyn TweetSource>,
    store: Option<&'a dyn DocumentStore>,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(fetcher: &'a dyn Fetcher, scorer: &'a dyn OpinionScorer) -> Self {
        Self {
            fetcher,
            scorer,
            tweets: None,
            store: None,
        }
    }

    #[must_use]
    pub fn with_tweets(mut self, tweets: &'a dyn TweetSource) -> Self {
        self.tweets = Some(tweets);
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: &'a dyn DocumentStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Run fetch → embed → score → persist once, strictly in order.
    ///
    /// 1. Fetch every URL. Failed URLs are logged and skipped.
    /// 2. Search tweets when a query and a tweet source are both present.
    ///    A failed search is logged and skipped.
    /// 3. Embed articles and tweets into their collections (skipped without a store).
    /// 4. Score each document in order. A failed document becomes a
    ///    [`ScoreFailure`] entry; the rest of the batch continues.
    /// 5. Persist the output, even when nothing was collected.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if embedding/storage or persistence fails.
    pub async fn run(&self, request: &RunRequest) -> Result<RunSummary, PipelineError> {
        let mut documents = Vec::new();

        for url in &request.urls {
            match self.fetcher.fetch(url).await {
                Ok(text) => documents.push(Document::article(url.clone(), text)),
                Err(e) if e.is_fetch() => {
                    tracing::warn!(url = %url, error = %e, "article fetch failed; skipping");
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "article body unreadable; skipping");
                }
            }
        }
        let fetched = documents.len();

        if let (Some(source), Some(query)) = (self.tweets, request.tweet_query.as_deref()) {
            match source.search_recent(query, request.max_tweets).await {
                Ok(tweets) => documents.extend(tweets),
                Err(e) => {
                    tracing::warn!(query, error = %e, "tweet search failed; skipping tweets");
                }
            }
        }
        let tweet_count = documents.len() - fetched;

        let embedded = match self.store {
            Some(store) => {
                let articles = texts_of(&documents, DocumentKind::Article);
                let tweets = texts_of(&documents, DocumentKind::Tweet);
                store
                    .embed_and_store(&articles, &request.article_collection)
                    .await?
                    + store
                        .embed_and_store(&tweets, &request.tweet_collection)
                        .await?
            }
            None => {
                tracing::info!("no vector store configured; skipping embedding");
                0
            }
        };

        let mut output = PipelineOutput::default();
        for document in &documents {
            match self.scorer.score(&document.text).await {
                Ok(score) => {
                    log_score(&document.source, &score);
                    let score = score.with_source(document.source.clone());
                    match document.kind {
                        DocumentKind::Article => output.articles.push(score),
                        DocumentKind::Tweet => output.tweets.push(score),
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        source = %document.source,
                        scorer = self.scorer.name(),
                        error = %e,
                        "scoring failed; recording failure"
                    );
                    output.failures.push(ScoreFailure {
                        source: document.source.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let scored = output.articles.len() + output.tweets.len();
        let failed = output.failures.len();
        output.stages = vec![
            stage("ingestion", documents.len()),
            stage("embedding", embedded),
            StageMetric {
                average_sentiment: mean_overall_sentiment(&output),
                ..stage("quantification", scored)
            },
        ];

        persist::save(&output, &request.output_path).await?;

        tracing::info!(
            fetched,
            tweets = tweet_count,
            embedded,
            scored,
            failed,
            "pipeline complete"
        );

        Ok(RunSummary {
            fetched,
            tweets: tweet_count,
            embedded,
            scored,
            failed,
            output_path: request.output_path.clone(),
        })
    }
}

fn texts_of(documents: &[Document], kind: DocumentKind) -> Vec<&str> {
    documents
        .iter()
        .filter(|d| d.kind == kind)
        .map(|d| d.text.as_str())
        .collect()
}

fn stage(name: &str, documents: usize) -> StageMetric {
    StageMetric {
        stage: name.to_string(),
        documents,
        average_sentiment: None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_overall_sentiment(output: &PipelineOutput) -> Option<f64> {
    let scores: Vec<f64> = output
        .articles
        .iter()
        .chain(&output.tweets)
        .map(|s| f64::from(s.overall_sentiment))
        .collect();
    (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64)
}

fn log_score(source: &str, score: &OpinionScore) {
    tracing::debug!(
        source,
        work_flexibility = score.work_flexibility,
        burnout_risk = score.burnout_risk,
        remote_work_appeal = score.remote_work_appeal,
        productivity_impact = score.productivity_impact,
        overall_sentiment = score.overall_sentiment,
        "scored document"
    );
}
