mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const DEFAULT_ARTICLE_URL: &str =
    "https://hbr.org/2021/01/work-life-balance-is-a-cycle-not-an-achievement";

#[derive(Debug, Parser)]
#[command(name = "opine")]
#[command(about = "Work-life balance opinion pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, embed, score, and persist articles (and optionally tweets)
    Run {
        /// Article URL to ingest; repeat for several
        #[arg(long = "url", default_value = DEFAULT_ARTICLE_URL)]
        urls: Vec<String>,

        /// Recent-search query for tweets; requires `TWITTER_BEARER_TOKEN`
        #[arg(long)]
        query: Option<String>,

        #[arg(long, default_value_t = 50)]
        max_tweets: u32,

        /// Use the fixed simulated score instead of calling Bedrock
        #[arg(long)]
        simulate: bool,

        /// Overrides `OPINE_OUTPUT_PATH`
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Score a single text and print the result as JSON
    Score {
        #[arg(long)]
        text: String,

        #[arg(long)]
        simulate: bool,
    },
    /// Render the HTML dashboard from a persisted output file
    Report {
        /// Overrides `OPINE_OUTPUT_PATH`
        #[arg(long)]
        input: Option<PathBuf>,

        /// Overrides `OPINE_REPORT_PATH`
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = opine_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Run {
            urls,
            query,
            max_tweets,
            simulate,
            output,
        }) => {
            let options = commands::RunOptions {
                urls,
                query,
                max_tweets,
                simulate,
                output,
            };
            commands::run_pipeline(&config, options).await?;
        }
        Some(Commands::Score { text, simulate }) => {
            commands::run_score(&config, &text, simulate).await?;
        }
        Some(Commands::Report { input, output }) => {
            commands::run_report(&config, input, output).await?;
        }
        None => println!("opine: use `opine run`, `opine score`, or `opine report` (see --help)"),
    }

    Ok(())
}
