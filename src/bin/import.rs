use clap::Parser;
use kinmcp::Config;
use kinmcp::db::{clear_persons, count_persons, Db};
use kinmcp::ingest::{import_file, ParserRegistry};
use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "import")]
#[command(about = "Import family members from a CSV or JSON file into the kinmcp database")]
struct Args {
    /// Member file (.csv with ID,FullName,Gender,... headers or .json array)
    file: PathBuf,

    /// Delete all stored members before importing
    #[arg(short, long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    let config = Config::load()?;
    log::info!("Database path: {}", config.db_path().display());

    let db = Db::new(config.db_path());
    db.migrate().await?;

    if args.replace {
        let removed = clear_persons(&db).await?;
        log::info!("Removed {} stored members", removed);
    }

    let start = Instant::now();
    let registry = ParserRegistry::new();
    let summary = import_file(&db, &args.file, &registry)
        .await
        .with_context(|| format!("Failed to import {}", args.file.display()))?;

    let total = count_persons(&db).await?;

    log::info!("=== Import Complete ===");
    log::info!("New members: {}", summary.inserted);
    log::info!("Updated members: {}", summary.updated);
    if summary.assigned_ids > 0 {
        log::info!("Ids assigned: {}", summary.assigned_ids);
    }
    log::info!("Reciprocal spouse links added: {}", summary.reciprocal_links);
    log::info!("Members stored: {}", total);
    log::info!("Time: {:?}", start.elapsed());

    Ok(())
}
