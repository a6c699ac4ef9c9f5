//! Work-life balance opinion pipeline.
//!
//! Fetches article paragraphs (and optionally recent tweets), embeds them via
//! TEI into Qdrant collections, scores each document with a hosted model on
//! Amazon Bedrock, persists the scores to `opinions.json`, and renders a
//! static HTML dashboard from that file.

pub mod embeddings;
pub mod error;
pub mod fetcher;
pub mod persist;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod tweets;
pub mod types;
pub mod vector_store;

mod http;

pub use embeddings::TeiClient;
pub use error::PipelineError;
pub use fetcher::{extract_paragraph_text, ArticleFetcher, Fetcher};
pub use http::build_http_client;
pub use pipeline::Pipeline;
pub use report::{render, ReportOutcome};
pub use scorer::{
    build_prompt, extract_json_from_generation, BedrockScorer, OpinionScorer, SimulatedScorer,
};
pub use tweets::{TweetSource, TwitterClient};
pub use types::{Document, DocumentKind, RunRequest, RunSummary};
pub use vector_store::{DocumentStore, QdrantClient, VectorIndex};
