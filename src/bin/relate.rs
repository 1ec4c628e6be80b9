use clap::Parser;
use kinmcp::db::{load_persons, Db};
use kinmcp::ingest::{read_records, ParserRegistry};
use kinmcp::{Config, FamilyGraph, Locale, ResolutionReport, Resolver};
use std::path::PathBuf;
use anyhow::Result;

#[derive(Parser, Debug)]
#[command(name = "relate")]
#[command(about = "Describe how two family members are related")]
struct Args {
    /// First person (full name, or id with --ids)
    person1: String,

    /// Second person (full name, or id with --ids)
    person2: String,

    /// Look people up by id instead of full name
    #[arg(long)]
    ids: bool,

    /// Read members from a CSV/JSON file instead of the database
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Label language (fa or en); defaults to the configured locale
    #[arg(short, long)]
    locale: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "warn")
    ).init();

    let args = Args::parse();

    let (graph, configured_locale) = match &args.data {
        Some(path) => {
            let records = read_records(path, &ParserRegistry::new())?;
            (FamilyGraph::from_records(records)?, None)
        }
        None => {
            let config = Config::load()?;
            let db = Db::new(config.db_path());
            db.migrate().await?;
            (FamilyGraph::new(load_persons(&db).await?), Some(config.locale()))
        }
    };

    let locale = match &args.locale {
        Some(code) => code.parse::<Locale>()?,
        None => configured_locale.unwrap_or_default(),
    };

    let resolver = Resolver::new(&graph).with_locale(locale);
    let result = if args.ids {
        resolver.resolve_ids(&args.person1, &args.person2)
    } else {
        resolver.resolve(&args.person1, &args.person2)
    };
    let report = ResolutionReport::from(result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let ResolutionReport::Error(_) = report {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &ResolutionReport) {
    match report {
        ResolutionReport::Simple(simple) => {
            println!("{} → {} → {}", simple.person1, simple.relation, simple.person2);
        }
        ResolutionReport::Complex(complex) => {
            println!("{} … {} ({} steps)", complex.person1, complex.person2, complex.relationships.len());
            for (step, (pair, label)) in complex.path.windows(2).zip(&complex.relationships).enumerate() {
                println!("  {}. {} → {} → {}", step + 1, pair[0].name, label, pair[1].name);
            }
        }
        ResolutionReport::Error(err) => {
            eprintln!("{}", err.message);
        }
    }
}
