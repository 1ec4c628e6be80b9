use rusqlite::Connection;
use std::path::Path;
use tokio::task;
use crate::error::{Result, KinmcpError};

const PRAGMAS: &str = "PRAGMA journal_mode = WAL; \
     PRAGMA synchronous = NORMAL; \
     PRAGMA foreign_keys = ON; \
     PRAGMA temp_store = MEMORY;";

/// Database connection wrapper
#[derive(Debug, Clone)]
pub struct Db {
    path: std::path::PathBuf,
}

impl Db {
    /// Create a new database connection manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a new database connection with the standard pragmas
    pub fn open_connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .map_err(KinmcpError::Database)?;

        // WAL for concurrent readers, NORMAL sync for speed, foreign keys so
        // spouse rows follow their person
        conn.execute_batch(PRAGMAS)?;

        Ok(conn)
    }

    /// Execute a closure with a database connection in a blocking task
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        task::spawn_blocking(move || {
            let mut conn = db.open_connection()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            KinmcpError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Database task failed: {}", e),
            ))
        })?
    }

    /// Apply the embedded schema migrations that this database is missing
    pub async fn migrate(&self) -> Result<()> {
        let applied = self.with_connection(migrate::run_migrations).await?;
        if applied > 0 {
            log::info!("Applied {} migrations to {}", applied, self.path.display());
        }
        Ok(())
    }
}

pub mod migrate;
pub mod store;

pub use store::{import_persons, load_persons, clear_persons, count_persons, ImportSummary};
