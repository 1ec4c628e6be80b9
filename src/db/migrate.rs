//! Schema migrations compiled into the binary.
//!
//! The applied version lives in SQLite's `user_version` header field, so a
//! database file carries its own schema version and `kinmcp serve` works from
//! any working directory.

use rusqlite::Connection;
use crate::error::{Result, KinmcpError};

pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    sql: &'static str,
}

/// Every schema step, in version order starting at 1.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "persons",
        sql: include_str!("../../migrations/001_persons.sql"),
    },
    Migration {
        version: 2,
        name: "person_indexes",
        sql: include_str!("../../migrations/002_person_indexes.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Bring the schema up to [`latest_version`]. Returns how many steps ran.
///
/// A database written by a newer build is refused rather than downgraded.
pub fn run_migrations(conn: &mut Connection) -> Result<usize> {
    let current = schema_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(KinmcpError::Config(format!(
            "Database schema version {} is newer than this build supports ({})",
            current, latest
        )));
    }

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        log::info!("Applying migration {:03}_{}", migration.version, migration.name);

        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql).map_err(|e| {
            KinmcpError::Config(format!(
                "Migration {:03}_{} failed: {}",
                migration.version, migration.name, e
            ))
        })?;
        // user_version is part of the database header, so it commits with the step
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
        applied += 1;
    }

    if applied == 0 {
        log::debug!("Schema at version {}, nothing to apply", current);
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(conn: &Connection, kind: &str) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name")
            .unwrap()
            .query_map([kind], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()
            .unwrap()
    }

    #[test]
    fn test_versions_are_sequential() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1, "{}", migration.name);
        }
        assert_eq!(latest_version(), 2);
    }

    #[test]
    fn test_full_migration_schema() {
        let temp_dir = TempDir::new().unwrap();
        let mut conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        assert_eq!(run_migrations(&mut conn).unwrap(), 2);
        assert_eq!(schema_version(&conn).unwrap(), latest_version());

        let tables = names(&conn, "table");
        assert!(tables.contains(&"persons".to_string()));
        assert!(tables.contains(&"person_spouses".to_string()));

        let indexes = names(&conn, "index");
        assert!(indexes.contains(&"idx_persons_father".to_string()));
        assert!(indexes.contains(&"idx_spouses_spouse".to_string()));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut conn = Connection::open(temp_dir.path().join("test.db")).unwrap();

        run_migrations(&mut conn).unwrap();
        assert_eq!(run_migrations(&mut conn).unwrap(), 0);
        assert_eq!(schema_version(&conn).unwrap(), 2);
    }

    #[test]
    fn test_partial_schema_resumes() {
        let temp_dir = TempDir::new().unwrap();
        let mut conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        conn.execute_batch(MIGRATIONS[0].sql).unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();

        assert_eq!(run_migrations(&mut conn).unwrap(), 1);
        assert!(names(&conn, "index").contains(&"idx_persons_full_name".to_string()));
    }

    #[test]
    fn test_newer_database_is_refused() {
        let temp_dir = TempDir::new().unwrap();
        let mut conn = Connection::open(temp_dir.path().join("test.db")).unwrap();
        conn.pragma_update(None, "user_version", 99).unwrap();

        let err = run_migrations(&mut conn).unwrap_err();
        assert!(matches!(err, KinmcpError::Config(_)));
        assert!(err.to_string().contains("99"));
    }
}
