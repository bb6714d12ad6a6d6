//! Interactive session loop.
//!
//! Reads one command per line from stdin. Generation runs on a spawned task
//! so the user can keep browsing while a request is in flight; the session
//! itself rejects a second trigger until the first one settles.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use super::render::{render_series, render_table};
use crate::core::{SeriesSelector, Session, SessionError};
use crate::export::{format_series, write_bulk_file, write_series_file};

const HELP: &str = "\
Commands:
  generate            ask the model for new series (runs in the background)
  status              show whether a request is in flight and the last error
  list                list generated series (newest first)
  show [n|seed]       show a series as cards (default: seed)
  copy [n|seed]       print a series transcript
  download [n|seed]   write a series transcript file
  download-all        write one file with every generated series
  help                show this help
  quit                leave the session";

/// Run the interactive loop until `quit` or end of input
pub async fn run(session: Arc<Session>, out_dir: PathBuf) -> Result<()> {
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next();

        in_flight.retain(|task| !task.is_finished());

        match command {
            "generate" | "g" => {
                if session.is_generating() {
                    println!("Already generating. Wait for the current request to finish.");
                } else {
                    in_flight.push(spawn_generation(Arc::clone(&session)));
                    println!("Arquitetando...");
                }
            }
            "status" => print_status(&session),
            "list" | "ls" => {
                let generated = session.generated();
                if generated.is_empty() {
                    println!("Nothing generated yet. Use 'generate'.");
                } else {
                    print!("{}", render_table(&generated));
                }
            }
            "show" => {
                if let Some(series) = select(&session, arg) {
                    println!("{}", render_series(&series));
                }
            }
            "copy" => {
                if let Some(series) = select(&session, arg) {
                    println!("{}", format_series(&series));
                }
            }
            "download" => {
                if let Some(series) = select(&session, arg) {
                    match write_series_file(&out_dir, &series).await {
                        Ok(path) => println!("Saved {}", path.display()),
                        Err(e) => eprintln!("❌ {:#}", e),
                    }
                }
            }
            "download-all" => {
                let generated = session.generated();
                if generated.is_empty() {
                    println!("Nothing generated yet. Use 'generate'.");
                } else {
                    match write_bulk_file(&out_dir, &generated).await {
                        Ok(path) => println!("Saved {} series to {}", generated.len(), path.display()),
                        Err(e) => eprintln!("❌ {:#}", e),
                    }
                }
            }
            "help" | "?" => println!("{}", HELP),
            "quit" | "exit" | "q" => break,
            other => println!("Unknown command: {} (type 'help')", other),
        }
    }

    // Requests cannot be cancelled; let any outstanding one settle
    if in_flight.iter().any(|task| !task.is_finished()) {
        eprintln!("Waiting for the in-flight generation to settle...");
    }
    for task in in_flight {
        task.await.context("Generation task panicked")?;
    }

    Ok(())
}

fn spawn_generation(session: Arc<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match session.start_generation().await {
            Ok(added) => println!(
                "\n✨ {} new series generated ({} total). Use 'list' to see them.",
                added,
                session.generated_count()
            ),
            Err(SessionError::AlreadyGenerating) => {
                println!("\nAlready generating. Wait for the current request to finish.")
            }
            Err(SessionError::Generation(_)) => {
                println!("\n❌ {}", session.error().unwrap_or_default());
            }
        }
    })
}

fn print_status(session: &Session) {
    let view = session.view();
    println!("Backend: {}", session.client_name());
    println!("Generating: {}", if view.generating { "yes" } else { "no" });
    println!("Generated series: {}", session.generated_count());
    if let Some(error) = view.error {
        println!("Last error: {}", error);
    }
}

fn select(session: &Session, arg: Option<&str>) -> Option<crate::domain::Series> {
    let selector = match arg.map(str::parse::<SeriesSelector>).transpose() {
        Ok(selector) => selector.unwrap_or(SeriesSelector::Seed),
        Err(e) => {
            println!("{}", e);
            return None;
        }
    };

    let series = session.get(selector);
    if series.is_none() {
        println!(
            "No such series. {} generated so far.",
            session.generated_count()
        );
    }
    series
}
