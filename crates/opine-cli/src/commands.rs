//! Command handlers for the CLI.

use std::path::PathBuf;

use anyhow::Context;
use opine_core::AppConfig;
use opine_pipeline::{
    build_http_client, ArticleFetcher, BedrockScorer, OpinionScorer, Pipeline, QdrantClient,
    ReportOutcome, RunRequest, SimulatedScorer, TeiClient, TwitterClient, VectorIndex,
};

const DEFAULT_ARTICLE_COLLECTION: &str = "articles_worklife";
const DEFAULT_TWEET_COLLECTION: &str = "tweets_worklife";

#[derive(Debug)]
pub(crate) struct RunOptions {
    pub urls: Vec<String>,
    pub query: Option<String>,
    pub max_tweets: u32,
    pub simulate: bool,
    pub output: Option<PathBuf>,
}

/// Pick the scorer for this invocation.
///
/// # Errors
///
/// Returns an error if Bedrock is selected but `AWS_BEARER_TOKEN_BEDROCK` is unset.
pub(crate) fn build_scorer(
    config: &AppConfig,
    client: reqwest::Client,
    simulate: bool,
) -> anyhow::Result<Box<dyn OpinionScorer>> {
    if simulate {
        return Ok(Box::new(SimulatedScorer));
    }
    let api_key = config.bedrock.api_key.as_deref().context(
        "AWS_BEARER_TOKEN_BEDROCK is not set; export it or pass --simulate",
    )?;
    Ok(Box::new(BedrockScorer::new(
        client,
        &config.bedrock.endpoint,
        &config.bedrock.model_id,
        api_key,
    )))
}

/// Run the full pipeline once and print a summary.
///
/// Embedding is enabled when TEI and Qdrant are configured. Tweets are
/// ingested only when both `--query` and `TWITTER_BEARER_TOKEN` are present.
///
/// # Errors
///
/// Returns an error if the scorer cannot be built, embedding fails, or the
/// output file cannot be written. Individual URL and scoring failures are not
/// errors.
pub(crate) async fn run_pipeline(config: &AppConfig, options: RunOptions) -> anyhow::Result<()> {
    let client = build_http_client(config.request_timeout_secs, &config.user_agent)?;
    let fetcher = ArticleFetcher::new(client.clone());
    let scorer = build_scorer(config, client.clone(), options.simulate)?;

    let index = config.embedding.as_ref().map(|embedding| {
        VectorIndex::new(
            TeiClient::new(client.clone(), &embedding.tei_url),
            QdrantClient::new(client.clone(), &embedding.qdrant_url, embedding.dimension),
        )
    });

    let twitter = match (&config.twitter_bearer_token, &options.query) {
        (Some(token), Some(_)) => Some(TwitterClient::new(
            client.clone(),
            &config.twitter_api_url,
            token,
        )),
        (None, Some(query)) => {
            tracing::warn!(query = %query, "TWITTER_BEARER_TOKEN is not set; skipping tweets");
            None
        }
        _ => None,
    };

    let mut pipeline = Pipeline::new(&fetcher, scorer.as_ref());
    if let Some(index) = &index {
        pipeline = pipeline.with_store(index);
    }
    if let Some(twitter) = &twitter {
        pipeline = pipeline.with_tweets(twitter);
    }

    let (article_collection, tweet_collection) = config.embedding.as_ref().map_or_else(
        || {
            (
                DEFAULT_ARTICLE_COLLECTION.to_string(),
                DEFAULT_TWEET_COLLECTION.to_string(),
            )
        },
        |e| (e.article_collection.clone(), e.tweet_collection.clone()),
    );

    let request = RunRequest {
        urls: options.urls,
        tweet_query: options.query,
        max_tweets: options.max_tweets,
        article_collection,
        tweet_collection,
        output_path: options.output.unwrap_or_else(|| config.output_path.clone()),
    };

    tracing::info!(
        urls = request.urls.len(),
        scorer = scorer.name(),
        embedding = index.is_some(),
        "starting pipeline run"
    );
    let summary = pipeline.run(&request).await?;

    println!(
        "fetched {} articles and {} tweets, embedded {}, scored {} ({} failed) -> {}",
        summary.fetched,
        summary.tweets,
        summary.embedded,
        summary.scored,
        summary.failed,
        summary.output_path.display()
    );
    Ok(())
}

/// Score one text and print the validated score as pretty JSON.
///
/// # Errors
///
/// Returns an error if the scorer cannot be built or the model call fails.
pub(crate) async fn run_score(
    config: &AppConfig,
    text: &str,
    simulate: bool,
) -> anyhow::Result<()> {
    let client = build_http_client(config.request_timeout_secs, &config.user_agent)?;
    let scorer = build_scorer(config, client, simulate)?;
    let score = scorer
        .score(text)
        .await
        .with_context(|| format!("{} scorer failed", scorer.name()))?;
    println!("{}", serde_json::to_string_pretty(&score)?);
    Ok(())
}

/// Render the dashboard. A missing input prints "no data" and succeeds.
///
/// # Errors
///
/// Returns an error if the input exists but cannot be read or the report
/// cannot be written.
pub(crate) async fn run_report(
    config: &AppConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let input = input.unwrap_or_else(|| config.output_path.clone());
    let output = output.unwrap_or_else(|| config.report_path.clone());

    match opine_pipeline::render(&input, &output).await? {
        ReportOutcome::NoData => println!("no data: {} not found", input.display()),
        ReportOutcome::Written { rows, path } => {
            println!("wrote {rows} rows to {}", path.display());
        }
    }
    Ok(())
}
