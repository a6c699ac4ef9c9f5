use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Article,
    Tweet,
}

/// A piece of text collected during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    /// Article URL or tweet permalink.
    pub source: String,
    pub kind: DocumentKind,
}

impl Document {
    #[must_use]
    pub fn article(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            kind: DocumentKind::Article,
        }
    }

    #[must_use]
    pub fn tweet(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            kind: DocumentKind::Tweet,
        }
    }
}

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub urls: Vec<String>,
    /// Recent-search query; tweets are skipped when `None`.
    pub tweet_query: Option<String>,
    pub max_tweets: u32,
    pub article_collection: String,
    pub tweet_collection: String,
    pub output_path: PathBuf,
}

/// Counts reported after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub tweets: usize,
    pub embedded: usize,
    pub scored: usize,
    pub failed: usize,
    pub output_path: PathBuf,
}
