use std::path::PathBuf;

use opine_core::ScoreValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    FetchStatus { url: String, status: u16 },

    #[error("HTML parse error for {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model response has no body")]
    MissingBody,

    #[error("invalid JSON in {context}: {source}")]
    InvalidJson {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not extract JSON from generation: {0}")]
    Extraction(String),

    #[error("opinion score failed validation: {0}")]
    SchemaValidation(#[from] ScoreValidationError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TEI embed error: {0}")]
    Embedding(String),

    #[error("Qdrant error: {0}")]
    VectorStore(String),

    #[error("Twitter API error: {0}")]
    Twitter(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` for the two ways a single URL can fail to download.
    #[must_use]
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::FetchStatus { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_failures_are_fetch_errors() {
        let err = PipelineError::FetchStatus {
            url: "https://example.com".to_string(),
            status: 503,
        };
        assert!(err.is_fetch());
    }

    #[test]
    fn undecodable_bodies_are_not_fetch_errors() {
        let err = PipelineError::Parse {
            url: "https://example.com".to_string(),
            reason: "invalid UTF-8".to_string(),
        };
        assert!(!err.is_fetch());
        assert!(!PipelineError::MissingBody.is_fetch());
    }
}
