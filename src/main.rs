use kinmcp::Config;
use kinmcp::db::{load_persons, migrate, Db};
use kinmcp::error::KinmcpError;
use kinmcp::ingest::to_csv;
use kinmcp::mcp::McpServer;
use anyhow::{Context, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Config first so its log_level can seed the filter; RUST_LOG still wins.
    // Logs go to stderr, stdout is reserved for the MCP transport.
    let config = Config::load();
    let level = config
        .as_ref()
        .map(|c| c.kinmcp.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", level)
    ).init();

    let config = config?;

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("verify");

    match command {
        "serve" => run_mcp_server(config).await?,
        "export" => run_export(config, args.get(2).map(String::as_str)).await?,
        "verify" => run_schema_verification(config).await?,
        other => anyhow::bail!("Unknown command '{}'. Usage: kinmcp [serve|verify|export [file.csv]]", other),
    }

    Ok(())
}

async fn open_db(config: &Config) -> Result<Db> {
    let db = Db::new(config.db_path());
    db.migrate()
        .await
        .with_context(|| format!("Failed to migrate {}", config.db_path().display()))?;
    Ok(db)
}

/// Run MCP server (stdio transport)
async fn run_mcp_server(config: Config) -> Result<()> {
    let db = open_db(&config).await?;
    let server = McpServer::new(db, config);
    server.run().await?;
    Ok(())
}

/// Write the stored members as CSV to a file or stdout
async fn run_export(config: Config, target: Option<&str>) -> Result<()> {
    let db = open_db(&config).await?;
    let persons = load_persons(&db).await?;
    let csv = to_csv(&persons)?;

    match target {
        Some(path) => {
            std::fs::write(path, csv).with_context(|| format!("Failed to write {}", path))?;
            log::info!("Exported {} persons to {}", persons.len(), path);
        }
        None => print!("{}", csv),
    }
    Ok(())
}

/// Run database schema verification
async fn run_schema_verification(config: Config) -> Result<()> {
    log::info!("Starting kinmcp v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Database path: {}", config.db_path().display());
    log::info!("Locale: {}", config.locale().code());

    let db = open_db(&config).await?;

    log::info!("Verifying database schema...");

    let persons = db.with_connection(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
        let tables: Vec<String> = stmt.query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        let expected_tables = ["persons", "person_spouses"];
        let mut all_tables_exist = true;
        for table in &expected_tables {
            if tables.iter().any(|t| t == table) {
                log::debug!("✓ Table exists: {}", table);
            } else {
                log::error!("Missing table: {}", table);
                all_tables_exist = false;
            }
        }
        if !all_tables_exist {
            return Err(KinmcpError::Config("Not all required tables exist".to_string()));
        }

        let version = migrate::schema_version(conn)?;
        if version != migrate::latest_version() {
            return Err(KinmcpError::Config(format!(
                "Schema version {} does not match expected {}",
                version,
                migrate::latest_version()
            )));
        }
        log::debug!("✓ Schema version {}", version);

        let journal_mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
        if journal_mode.to_uppercase() != "WAL" {
            return Err(KinmcpError::Config(format!("Journal mode is not WAL: {}", journal_mode)));
        }

        let foreign_keys: i32 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        if foreign_keys != 1 {
            return Err(KinmcpError::Config("Foreign keys not enabled".to_string()));
        }

        let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if integrity != "ok" {
            return Err(KinmcpError::Config(format!("Database integrity check failed: {}", integrity)));
        }
        log::info!("✓ Database integrity: OK");

        // Spouse rows must belong to a stored person; spouse_id itself may dangle
        let orphans: i64 = conn.query_row(
            "SELECT COUNT(*) FROM person_spouses WHERE person_id NOT IN (SELECT id FROM persons)",
            [],
            |row| row.get(0),
        )?;
        if orphans > 0 {
            return Err(KinmcpError::Config(format!("{} spouse rows without a person", orphans)));
        }

        let persons: i64 = conn.query_row("SELECT COUNT(*) FROM persons", [], |row| row.get(0))?;
        Ok(persons)
    }).await?;

    // A snapshot must load cleanly (e.g. every stored gender parses)
    let loaded = load_persons(&db).await?;
    if loaded.len() as i64 != persons {
        anyhow::bail!("Loaded {} persons but table holds {}", loaded.len(), persons);
    }

    log::info!("✓ Database schema verification complete ({} persons)", persons);
    Ok(())
}
