//! SummarAIze MCP server - Entry Point
//!
//! Speaks MCP over stdio; logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use summaraize::{
    OllamaClient,
    config::{self, Config},
    server::McpServer,
};

#[derive(Parser, Debug)]
#[command(name = "summaraize")]
#[command(about = "Research paper organizer with citation registry and local LLM summaries, served over MCP")]
#[command(version)]
struct Cli {
    /// Directory holding one folder per project (default ~/.summaraize)
    #[arg(long, env = "SUMMARAIZE_HOME")]
    data_dir: Option<PathBuf>,

    /// Ollama endpoint
    #[arg(long, env = "OLLAMA_HOST")]
    llm_url: Option<String>,

    /// Generation model
    #[arg(long, env = "SUMMARAIZE_MODEL")]
    model: Option<String>,

    /// Embedding model
    #[arg(long, env = "SUMMARAIZE_EMBED_MODEL")]
    embed_model: Option<String>,

    /// Do not spawn `ollama serve` when the runtime is not reachable
    #[arg(long)]
    no_auto_start: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn build_config(cli: Cli) -> anyhow::Result<Config> {
    let mut config = match cli.data_dir {
        Some(dir) => Config::new(dir),
        None => Config::from_env()?,
    };

    if let Some(url) = cli.llm_url {
        config.llm_url = config::normalize_ollama_host(&url);
    }
    if let Some(model) = cli.model {
        config.llm_model = model;
    }
    if let Some(model) = cli.embed_model {
        config.embed_model = model;
    }
    config.auto_start_llm = !cli.no_auto_start;

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting SummarAIze MCP server");

    let config = build_config(cli)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        llm_url = %config.llm_url,
        model = %config.llm_model,
        "Configuration loaded"
    );

    let ollama = OllamaClient::new(&config)?;
    if let Err(e) = ollama.ensure_running(config.auto_start_llm, config.llm_startup_wait).await {
        tracing::error!(error = %e, "Language model runtime unavailable");
        return Err(e.into());
    }

    let server = McpServer::new(config, ollama)?;
    server.run_stdio().await?;

    Ok(())
}
