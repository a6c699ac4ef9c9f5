use crate::app_config::{AppConfig, BedrockConfig, EmbeddingConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    // Empty values count as unset so `FOO=` in a .env file disables a feature.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("OPINE_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("OPINE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("OPINE_USER_AGENT", "opine/0.1 (opinion-pipeline)");
    let output_path = PathBuf::from(or_default("OPINE_OUTPUT_PATH", "opinions.json"));
    let report_path = PathBuf::from(or_default("OPINE_REPORT_PATH", "dashboard.html"));

    let dimension = parse_u64("OPINE_EMBEDDING_DIM", "384")?;
    if dimension == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "OPINE_EMBEDDING_DIM".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let embedding = match (optional("OPINE_TEI_URL"), optional("OPINE_QDRANT_URL")) {
        (Some(tei_url), Some(qdrant_url)) => Some(EmbeddingConfig {
            tei_url: tei_url.trim_end_matches('/').to_string(),
            qdrant_url: qdrant_url.trim_end_matches('/').to_string(),
            article_collection: or_default("OPINE_ARTICLE_COLLECTION", "articles_worklife"),
            tweet_collection: or_default("OPINE_TWEET_COLLECTION", "tweets_worklife"),
            dimension,
        }),
        _ => None,
    };

    let region = or_default("AWS_REGION", "ap-south-1");
    let endpoint = optional("OPINE_BEDROCK_ENDPOINT")
        .unwrap_or_else(|| format!("https://bedrock-runtime.{region}.amazonaws.com"))
        .trim_end_matches('/')
        .to_string();
    let bedrock = BedrockConfig {
        model_id: or_default("OPINE_BEDROCK_MODEL_ID", "meta.llama3-70b-instruct-v1:0"),
        endpoint,
        api_key: optional("AWS_BEARER_TOKEN_BEDROCK"),
        region,
    };

    let twitter_bearer_token = optional("TWITTER_BEARER_TOKEN");
    let twitter_api_url = or_default("OPINE_TWITTER_API_URL", "https://api.twitter.com")
        .trim_end_matches('/')
        .to_string();

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        output_path,
        report_path,
        embedding,
        bedrock,
        twitter_bearer_token,
        twitter_api_url,
    })
}
