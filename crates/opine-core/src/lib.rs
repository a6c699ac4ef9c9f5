//! Shared configuration and data model for the opinion pipeline.

mod app_config;
mod config;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, BedrockConfig, EmbeddingConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    OpinionScore, PipelineOutput, ScoreFailure, ScoreValidationError, StageMetric, METRIC_KEYS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
