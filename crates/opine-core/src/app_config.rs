use std::path::PathBuf;

/// Text embedding + vector store endpoints. Present only when both
/// `OPINE_TEI_URL` and `OPINE_QDRANT_URL` are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    pub tei_url: String,
    pub qdrant_url: String,
    pub article_collection: String,
    pub tweet_collection: String,
    pub dimension: u64,
}

#[derive(Clone)]
pub struct BedrockConfig {
    pub region: String,
    pub model_id: String,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for BedrockConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockConfig")
            .field("region", &self.region)
            .field("model_id", &self.model_id)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub output_path: PathBuf,
    pub report_path: PathBuf,
    pub embedding: Option<EmbeddingConfig>,
    pub bedrock: BedrockConfig,
    pub twitter_bearer_token: Option<String>,
    pub twitter_api_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("output_path", &self.output_path)
            .field("report_path", &self.report_path)
            .field("embedding", &self.embedding)
            .field("bedrock", &self.bedrock)
            .field(
                "twitter_bearer_token",
                &self.twitter_bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field("twitter_api_url", &self.twitter_api_url)
            .finish()
    }
}
