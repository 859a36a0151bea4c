//! Database schema management
//!
//! This module provides schema definitions and idempotent creation for the
//! trivia database. All tables are defined here to ensure consistency.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Fixed application metadata upserted into `app_info` on every run.
pub const APP_METADATA: &[(&str, &str)] = &[
    ("project_name", "interactive-trivia-challenge"),
    ("version", "0.2.0"),
    (
        "description",
        "SQLite DB for interactive trivia questions and sessions.",
    ),
];

/// Schema definitions for all tables in the trivia database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the app_info table (static project metadata)
    pub const APP_INFO_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS app_info (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT UNIQUE NOT NULL,
            value TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
    "#;

    /// SQL for creating the users table (declared for future work, unused)
    pub const USERS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            email TEXT UNIQUE NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
    "#;

    /// SQL for creating the questions table
    ///
    /// Questions carry an explicit stable `code` so seeding stays idempotent
    /// across runs.
    pub const QUESTIONS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS trivia_questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT UNIQUE NOT NULL,
            question_text TEXT NOT NULL,
            category TEXT,
            difficulty TEXT,
            explanation TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
    "#;

    /// SQL for creating the choices table
    pub const CHOICES_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS trivia_choices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_id INTEGER NOT NULL,
            choice_text TEXT NOT NULL,
            choice_order INTEGER NOT NULL,
            is_correct INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (question_id) REFERENCES trivia_questions(id) ON DELETE CASCADE,
            UNIQUE (question_id, choice_order)
        );
    "#;

    /// SQL for creating lookup indexes for typical query patterns
    pub const TRIVIA_INDEXES: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_trivia_choices_question_id ON trivia_choices(question_id)",
        "CREATE INDEX IF NOT EXISTS idx_trivia_questions_category ON trivia_questions(category)",
    ];

    /// Tables that must exist for the schema to be considered initialized
    pub const REQUIRED_TABLES: &'static [&'static str] =
        &["app_info", "users", "trivia_questions", "trivia_choices"];
}

/// Schema manager for the trivia database
///
/// Handles idempotent schema creation and integrity checks.
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Initialize the database schema
    ///
    /// Creates all tables and indexes if they don't exist. Structural
    /// creation only, safe to re-run against an initialized database.
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute(SchemaDefinitions::APP_INFO_TABLE, [])
            .map_err(|e| anyhow!("failed to create app_info table: {}", e))?;

        self.conn
            .execute(SchemaDefinitions::USERS_TABLE, [])
            .map_err(|e| anyhow!("failed to create users table: {}", e))?;

        self.conn
            .execute(SchemaDefinitions::QUESTIONS_TABLE, [])
            .map_err(|e| anyhow!("failed to create trivia_questions table: {}", e))?;

        self.conn
            .execute(SchemaDefinitions::CHOICES_TABLE, [])
            .map_err(|e| anyhow!("failed to create trivia_choices table: {}", e))?;

        for index_sql in SchemaDefinitions::TRIVIA_INDEXES {
            self.conn
                .execute(index_sql, [])
                .map_err(|e| anyhow!("failed to create trivia index: {}", e))?;
        }

        Ok(())
    }

    /// Upsert the fixed application metadata rows (write replaces)
    pub fn upsert_app_metadata(&self) -> Result<()> {
        for (key, value) in APP_METADATA {
            self.conn
                .execute(
                    "INSERT OR REPLACE INTO app_info (key, value) VALUES (?1, ?2)",
                    [key, value],
                )
                .map_err(|e| anyhow!("failed to upsert app_info key '{}': {}", key, e))?;
        }
        Ok(())
    }

    /// Get an application metadata value
    pub fn get_app_meta(&self, key: &str) -> Result<Option<String>> {
        let result: Result<String, _> = self.conn.query_row(
            "SELECT value FROM app_info WHERE key = ?1",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("failed to get app_info value: {}", e)),
        }
    }

    /// Verify schema integrity by checking required tables exist
    pub fn verify_integrity(&self) -> Result<bool> {
        for table in SchemaDefinitions::REQUIRED_TABLES {
            let exists: i32 = self
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap_or(0);

            if exists == 0 {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Reset the database by dropping all trivia tables
    ///
    /// Never called by initialization; only the explicit `reset` command
    /// reaches this.
    pub fn reset(&self) -> Result<()> {
        // Children first so the drop order never trips the foreign key.
        self.conn.execute("DROP TABLE IF EXISTS trivia_choices", [])?;
        self.conn
            .execute("DROP TABLE IF EXISTS trivia_questions", [])?;
        self.conn.execute("DROP TABLE IF EXISTS users", [])?;
        self.conn.execute("DROP TABLE IF EXISTS app_info", [])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConn;

    fn create_test_db() -> DatabaseConn {
        DatabaseConn::open_in_memory().unwrap()
    }

    #[test]
    fn test_initialize_creates_all_tables() {
        let db = create_test_db();
        let manager = SchemaManager::new(&db.conn);

        assert!(!manager.verify_integrity().unwrap());
        manager.initialize().unwrap();
        assert!(manager.verify_integrity().unwrap());

        for table in SchemaDefinitions::REQUIRED_TABLES {
            assert!(db.table_exists(table).unwrap(), "missing table {}", table);
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let db = create_test_db();
        let manager = SchemaManager::new(&db.conn);

        manager.initialize().unwrap();
        db.conn
            .execute(
                "INSERT INTO trivia_questions (code, question_text) VALUES ('X_001', 'kept?')",
                [],
            )
            .unwrap();

        // Re-running must neither fail nor destroy data.
        manager.initialize().unwrap();
        assert_eq!(db.table_count("trivia_questions").unwrap(), 1);
    }

    #[test]
    fn test_upsert_app_metadata_replaces() {
        let db = create_test_db();
        let manager = SchemaManager::new(&db.conn);
        manager.initialize().unwrap();

        manager.upsert_app_metadata().unwrap();
        assert_eq!(
            manager.get_app_meta("project_name").unwrap().as_deref(),
            Some("interactive-trivia-challenge")
        );

        db.conn
            .execute(
                "INSERT OR REPLACE INTO app_info (key, value) VALUES ('version', 'stale')",
                [],
            )
            .unwrap();

        manager.upsert_app_metadata().unwrap();
        assert_eq!(
            manager.get_app_meta("version").unwrap().as_deref(),
            Some("0.2.0")
        );
        // One row per key, not one per run.
        assert_eq!(db.table_count("app_info").unwrap(), APP_METADATA.len() as u64);
    }

    #[test]
    fn test_get_app_meta_missing_key() {
        let db = create_test_db();
        let manager = SchemaManager::new(&db.conn);
        manager.initialize().unwrap();

        assert_eq!(manager.get_app_meta("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_reset() {
        let db = create_test_db();
        let manager = SchemaManager::new(&db.conn);

        manager.initialize().unwrap();
        assert!(manager.verify_integrity().unwrap());

        manager.reset().unwrap();
        assert!(!manager.verify_integrity().unwrap());
    }
}
