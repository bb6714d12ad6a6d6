//! Command-line interface for finance-architect.
//!
//! Provides commands for showing and exporting the seed series, generating
//! new series with Gemini, running an interactive session, and inspecting
//! the prompt, schema and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::GeminiClient;
use crate::config::{self, ResolvedConfig};
use crate::core::{build_prompt, response_schema, SeriesSelector, Session};
use crate::domain::{resolve_seed, Series};
use crate::export::{format_series, write_bulk_file, write_series_file};

pub mod interactive;
pub mod render;

use render::{render_series, render_table};

/// finance-architect - Narrative series generator for a finance channel
#[derive(Parser, Debug)]
#[command(name = "finance-architect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the seed series, or one series from a fresh generation
    Show {
        /// Run one generation and show its Nth series (1 is the first)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        index: Option<u64>,

        /// Print the plain-text transcript instead of cards
        #[arg(short, long)]
        transcript: bool,
    },

    /// Export the seed series transcript
    Export {
        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the transcript instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Generate new series in the style of the seed series
    Generate {
        /// Number of generation requests to make, one after another
        #[arg(short, long, default_value = "1")]
        rounds: usize,

        /// Output directory for downloads (defaults to the configured one)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write one transcript file per generated series
        #[arg(long)]
        download: bool,

        /// Write one combined file with every generated series
        #[arg(long)]
        download_all: bool,

        /// Print transcripts instead of cards
        #[arg(short, long)]
        transcript: bool,
    },

    /// Start an interactive session
    Session {
        /// Output directory for downloads (defaults to the configured one)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the prompt that would be sent for the seed series
    Prompt,

    /// Print the structured-output schema sent with each request
    Schema,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Show { index, transcript } => show(index, transcript).await,
            Commands::Export { out, stdout } => export_seed(out, stdout).await,
            Commands::Generate {
                rounds,
                out,
                download,
                download_all,
                transcript,
            } => generate(rounds, out, download, download_all, transcript).await,
            Commands::Session { out } => run_session(out).await,
            Commands::Prompt => show_prompt().await,
            Commands::Schema => show_schema(),
            Commands::Config => show_config(),
        }
    }
}

/// Build a session backed by Gemini from the resolved configuration
async fn open_session(cfg: &ResolvedConfig) -> Result<Session> {
    let seed = resolve_seed(cfg.seed_file.as_deref()).await?;
    let client = GeminiClient::from_config(cfg);
    Ok(Session::new(seed, Arc::new(client)))
}

fn output_dir(cfg: &ResolvedConfig, out: Option<PathBuf>) -> PathBuf {
    out.unwrap_or_else(|| cfg.output_dir.clone())
}

/// Show the seed series, or the Nth series of one inline generation
async fn show(index: Option<u64>, transcript: bool) -> Result<()> {
    let cfg = config::config()?;

    let series = match index {
        None => resolve_seed(cfg.seed_file.as_deref()).await?,
        Some(n) => {
            let session = open_session(cfg).await?;
            eprintln!("✨ Arquitetando...");
            pick_generated(&session, n).await?
        }
    };

    if transcript {
        println!("{}", format_series(&series));
    } else {
        println!("{}", render_series(&series));
    }

    Ok(())
}

/// Run one generation and return its `n`th series (one-based)
async fn pick_generated(session: &Session, n: u64) -> Result<Series> {
    if let Err(e) = session.start_generation().await {
        eprintln!("❌ {}", session.error().unwrap_or_default());
        return Err(e).context("Generation failed");
    }

    let count = session.generated_count();
    let idx = n
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .unwrap_or(usize::MAX);
    session
        .get(SeriesSelector::Generated(idx))
        .with_context(|| format!("Series {} not available: {} generated", n, count))
}

/// Export the seed series transcript
async fn export_seed(out: Option<PathBuf>, to_stdout: bool) -> Result<()> {
    let cfg = config::config()?;
    let seed = resolve_seed(cfg.seed_file.as_deref()).await?;

    if to_stdout {
        println!("{}", format_series(&seed));
        return Ok(());
    }

    let path = write_series_file(&output_dir(cfg, out), &seed).await?;
    eprintln!("📄 Saved {}", path.display());

    Ok(())
}

/// Run generation rounds in a single session
async fn generate(
    rounds: usize,
    out: Option<PathBuf>,
    download: bool,
    download_all: bool,
    transcript: bool,
) -> Result<()> {
    if rounds == 0 {
        anyhow::bail!("--rounds must be at least 1");
    }

    let cfg = config::config()?;
    let session = open_session(cfg).await?;
    let mut failures = 0;

    for round in 1..=rounds {
        eprintln!("✨ Arquitetando... (round {}/{})", round, rounds);

        match session.start_generation().await {
            Ok(added) => eprintln!("   {} new series", added),
            Err(e) => {
                failures += 1;
                eprintln!("❌ {}", session.error().unwrap_or_default());
                eprintln!("   {}", e);
            }
        }
    }

    let generated = session.generated();

    if generated.is_empty() {
        eprintln!("\nNo series generated.");
    } else {
        eprintln!("\n{}", render_table(&generated));
        for series in &generated {
            if transcript {
                println!("{}\n", format_series(series));
            } else {
                println!("{}", render_series(series));
            }
        }
    }

    let dir = output_dir(cfg, out);

    if download {
        for series in &generated {
            let path = write_series_file(&dir, series).await?;
            eprintln!("📄 Saved {}", path.display());
        }
    }

    // The combined file is only offered once something was generated
    if download_all && !generated.is_empty() {
        let path = write_bulk_file(&dir, &generated).await?;
        eprintln!("📚 Saved {} series to {}", generated.len(), path.display());
    }

    if failures == rounds {
        anyhow::bail!("All {} generation round(s) failed", rounds);
    }

    Ok(())
}

/// Start an interactive session
async fn run_session(out: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let session = Arc::new(open_session(cfg).await?);

    if let Some(seed) = session.get(SeriesSelector::Seed) {
        println!("{}", render_series(&seed));
    }

    interactive::run(session, output_dir(cfg, out)).await
}

/// Print the prompt built from the seed series
async fn show_prompt() -> Result<()> {
    let cfg = config::config()?;
    let seed = resolve_seed(cfg.seed_file.as_deref()).await?;
    let prompt = build_prompt(&seed).context("Seed series cannot be used as a reference")?;
    println!("{}", prompt);
    Ok(())
}

/// Print the response schema
fn show_schema() -> Result<()> {
    let schema = serde_json::to_string_pretty(&response_schema())?;
    println!("{}", schema);
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Finance Architect Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Gemini:");
    println!("  API key:  {}", cfg.masked_api_key());
    println!("  Model:    {}", cfg.model);
    println!("  Endpoint: {}", cfg.endpoint);
    println!();
    println!("Export:");
    println!("  Output directory: {}", cfg.output_dir.display());
    println!();
    println!(
        "Seed: {}",
        cfg.seed_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".to_string())
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ScriptedClient, ScriptedOutcome};
    use crate::domain::builtin_seed;

    fn session_with(script: Vec<ScriptedOutcome>) -> Session {
        Session::new(builtin_seed().unwrap(), Arc::new(ScriptedClient::new(script)))
    }

    #[test]
    fn test_show_index_parses_and_rejects_zero() {
        let cli = Cli::try_parse_from(["finance-architect", "show", "--index", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Show {
                index: Some(2),
                transcript: false
            }
        ));

        assert!(Cli::try_parse_from(["finance-architect", "show", "--index", "0"]).is_err());
    }

    #[tokio::test]
    async fn test_pick_generated_returns_nth_series() {
        let session = session_with(vec![ScriptedOutcome::Series(vec![
            Series::new("A", "a"),
            Series::new("B", "b"),
        ])]);

        let series = pick_generated(&session, 2).await.unwrap();
        assert_eq!(series.title, "B");
    }

    #[tokio::test]
    async fn test_pick_generated_out_of_range() {
        let session = session_with(vec![ScriptedOutcome::Series(vec![Series::new("A", "a")])]);

        let err = pick_generated(&session, 3).await.unwrap_err();
        assert!(err.to_string().contains("1 generated"));
    }

    #[tokio::test]
    async fn test_pick_generated_surfaces_failure() {
        let session = session_with(vec![ScriptedOutcome::ApiError {
            status: 429,
            message: "quota".to_string(),
        }]);

        assert!(pick_generated(&session, 1).await.is_err());
        assert_eq!(session.generated_count(), 0);
    }
}
