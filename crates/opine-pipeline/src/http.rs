use std::time::Duration;

use reqwest::Client;

use crate::error::PipelineError;

/// Build the HTTP client shared by every stage of a run.
///
/// # Errors
///
/// Returns [`PipelineError::Client`] if the underlying `reqwest::Client`
/// cannot be constructed (e.g., invalid TLS config).
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, PipelineError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()
        .map_err(PipelineError::Client)
}
