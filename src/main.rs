mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rulefusion::config::DEFAULT_CONFIG_PATH;
use rulefusion::discover::FileDetector;
use rulefusion::{Config, FileParser, Options, check_verbose_with};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RULEFUSION_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Static,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "rulefusion", version, about = "Cross-tool consistency checks for AI assistant rule files")]
struct Cli {
    /// Settings file, relative to --root unless absolute
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Project root to scan
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Analysis mode. `ai` falls back to static analysis.
    #[arg(long, value_enum, default_value_t = Mode::Static)]
    mode: Mode,

    /// AI provider (accepted, unused)
    #[arg(long)]
    ai_provider: Option<String>,

    /// AI model (accepted, unused)
    #[arg(long)]
    ai_model: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Show timing and per-rule breakdown
    #[arg(short, long)]
    verbose: bool,

    /// Force ANSI color output
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.mode == Mode::Ai {
        tracing::warn!(provider = ?cli.ai_provider, model = ?cli.ai_model, "AI mode is not available");
        eprintln!("AI mode is not available; running static analysis instead.");
    }

    let config_path = Config::resolve_path(&cli.root, &cli.config);
    let config = Config::load(Some(&config_path)).context("failed to load configuration")?;

    let documents = FileDetector::new(&config, &cli.root).detect().context("failed to discover files")?;
    if documents.is_empty() {
        println!("No files detected for analysis.");
        return Ok(ExitCode::SUCCESS);
    }

    let parser = FileParser::new(&cli.root);
    let options = Options { rules: config.rules };
    let res = check_verbose_with(&documents, &parser, &options).await;

    match cli.format {
        Format::Json => {
            let text = serde_json::to_string_pretty(&res.result).context("failed to serialize report")?;
            println!("{text}");
        }
        Format::Text => {
            let color = if cli.no_color {
                false
            } else {
                cli.color || io::stdout().is_terminal()
            };
            let details = cli.verbose.then_some(&res.details);
            print!("{}", report::render(&res.result, details, color));
        }
    }

    Ok(ExitCode::from(res.result.exit_code()))
}
