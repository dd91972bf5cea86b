//! Command-line front end for the quote catalog.
//!
//! # Responsibility
//! - Forward user actions (add, filter, import, export, sync) into the core.
//! - Render quotes, categories and sync outcomes as plain text.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use quotebook_core::{
    default_log_level, init_logging, share_store, KvQuoteRepository, MemoryKeyValueStore, Quote,
    QuoteStore, QuotebookConfig, SqliteKeyValueStore, SyncEngine, SyncEvent,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(Debug, Parser)]
#[command(name = "quotebook", version, about = "Quote catalog with remote sync")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a random quote from the active filter.
    Show,
    /// Add a quote.
    Add { text: String, category: String },
    /// Select a category (`all` for every quote) and list the result.
    Filter { category: String },
    /// List quotes in the active filter.
    List,
    /// List known categories.
    Categories,
    /// Write the collection as JSON to a file or stdout.
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Append quotes from a JSON file.
    Import { file: PathBuf },
    /// Run one sync cycle.
    Sync,
    /// Keep syncing on the configured interval until Ctrl-C.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => QuotebookConfig::load(path)?,
        None => QuotebookConfig::default(),
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }
    if config.data_dir.is_none() {
        config.data_dir = dirs::data_dir().map(|dir| dir.join("quotebook"));
    }

    let data_dir = config
        .data_dir
        .clone()
        .context("no data directory available; pass --data-dir")?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create `{}`", data_dir.display()))?;
    let data_dir = std::fs::canonicalize(&data_dir)?;
    config.data_dir = Some(data_dir.clone());

    let level = config
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, data_dir.join("logs"))?;

    let db_path = config.db_path().context("data directory is not set")?;
    let durable = Arc::new(SqliteKeyValueStore::open(&db_path)?);
    let repo = KvQuoteRepository::new(durable, Arc::new(MemoryKeyValueStore::new()));
    let mut store = QuoteStore::initialize(repo)?;

    match cli.command {
        Command::Show => match store.last_viewed().or_else(|| store.random_quote()) {
            Some(quote) => print_quote(&quote),
            None => println!("No quotes available in this category. Add some quotes!"),
        },
        Command::Add { text, category } => {
            let quote = store.add(text, category)?;
            println!("Quote added successfully!");
            print_quote(&quote);
        }
        Command::Filter { category } => {
            let view = store.set_filter(&category)?;
            if view.is_empty() {
                println!("No quotes found in this category.");
            }
            view.iter().for_each(print_quote);
        }
        Command::List => store.filtered().iter().for_each(print_quote),
        Command::Categories => {
            println!("all");
            store
                .list_categories()
                .iter()
                .for_each(|category| println!("{category}"));
        }
        Command::Export { output } => {
            let snapshot = store.export_snapshot()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, snapshot)
                        .with_context(|| format!("failed to write `{}`", path.display()))?;
                    println!("Quotes exported successfully!");
                }
                None => println!("{snapshot}"),
            }
        }
        Command::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("error reading `{}`", file.display()))?;
            let accepted = store.import_json(&content)?;
            println!("{accepted} quote(s) imported successfully!");
        }
        Command::Sync => {
            let engine = SyncEngine::from_config(share_store(store), &config.sync)?;
            let report = engine.run_sync_cycle().await?;
            if !report.origin.is_live() {
                println!("Remote unavailable; used offline quotes.");
            }
            println!("{}", report.summary());
        }
        Command::Watch => {
            let engine = SyncEngine::from_config(share_store(store), &config.sync)?;
            let mut events = engine.subscribe();
            engine.set_auto_sync(true);
            println!(
                "Auto sync enabled (every {} seconds)",
                config.sync.interval().as_secs()
            );

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = events.recv() => match event {
                        Ok(SyncEvent::Started) => println!("Syncing..."),
                        Ok(SyncEvent::Completed(report)) => println!("{}", report.summary()),
                        Ok(SyncEvent::Failed(reason)) => println!("Sync failed: {reason}"),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    },
                }
            }

            engine.shutdown();
            info!("event=cli_watch module=cli status=stopped");
            println!("Auto sync disabled");
        }
    }

    Ok(())
}

fn print_quote(quote: &Quote) {
    println!("\"{}\" ({})", quote.text, quote.category);
}
