use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trivia_quiz::{ConfigOverrides, EmailStore, Quiz, QuizConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Email address to prefill on the start screen
    #[arg(short, long)]
    email: Option<String>,

    /// TOML config file (defaults to the per-user config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of questions to fetch
    #[arg(short = 'n', long)]
    amount: Option<usize>,

    /// Time limit in seconds
    #[arg(short, long)]
    time_limit: Option<u32>,

    /// Trivia API endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let mut config = QuizConfig::load(args.config.as_deref())?;
    config.apply(ConfigOverrides {
        amount: args.amount,
        time_limit_secs: args.time_limit,
        api_url: args.api_url,
    });
    config.validate()?;

    let quiz = Quiz::new(&config)?
        .with_email_store(EmailStore::default_location())
        .with_email(args.email);

    let app = quiz.run().await.context("quiz terminated with an error")?;

    if let Some((context, report)) = app.last_result() {
        println!(
            "{} scored {} / {} ({:.0}%)",
            context.email,
            report.score,
            report.total(),
            report.percentage()
        );
    }

    Ok(())
}

/// Logs go to a file; the terminal belongs to the quiz screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trivia_quiz=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
