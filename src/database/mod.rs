//! Database module
//!
//! This module provides all database functionality for triviadb:
//!
//! - **connection**: SQLite `DatabaseConn` wrapper
//! - **schema**: table/index definitions and idempotent creation
//! - **seed**: the starter question catalog and its reconciler
//!
//! [`TriviaDatabase`] is the main entry point, tying the three together and
//! exposing the row counts the orchestrator reports.

mod connection;
mod schema;
mod seed;

pub use connection::DatabaseConn;
pub use schema::{SchemaDefinitions, SchemaManager, APP_METADATA};
pub use seed::{starter_questions, SeedQuestion, SeedReconciler, SeedReport};

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tracing::info;

/// Main trivia database (SQLite backend)
///
/// `TriviaDatabase` provides a unified interface over the trivia schema:
/// opening and configuring the connection, the transactional
/// initialize-and-seed pass, and the count queries used for reporting.
pub struct TriviaDatabase {
    db: DatabaseConn,
}

/// One seeded question, as shown by the status command
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct QuestionSummary {
    pub code: String,
    pub category: String,
    pub difficulty: String,
    pub question_text: String,
    pub choices: u64,
}

impl TriviaDatabase {
    /// Open the trivia database at the specified path
    ///
    /// The file is created if it does not exist. A basic connectivity check
    /// runs before the handle is returned.
    pub fn open(path: &Path) -> Result<Self> {
        let db = DatabaseConn::open_path(path)?;
        db.ping()?;
        Ok(Self { db })
    }

    /// Create an in-memory trivia database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let db = DatabaseConn::open_in_memory()?;
        Ok(Self { db })
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db.conn
    }

    /// Create the schema, upsert app metadata, and reconcile the seed catalog
    ///
    /// Everything runs inside one transaction: an error anywhere before the
    /// commit leaves the database exactly as it was. Safe to re-run.
    pub fn initialize(&self) -> Result<SeedReport> {
        let tx = self.db.transaction()?;

        let schema = SchemaManager::new(&tx);
        schema.initialize()?;
        schema.upsert_app_metadata()?;

        let report = SeedReconciler::new(&tx).apply(starter_questions())?;

        tx.commit()
            .map_err(|e| anyhow!("failed to commit initialization: {}", e))?;

        info!(
            "seeded {} questions, skipped {} already present",
            report.inserted, report.skipped
        );
        Ok(report)
    }

    /// Whether all required tables exist
    pub fn is_initialized(&self) -> Result<bool> {
        SchemaManager::new(&self.db.conn).verify_integrity()
    }

    /// Count of user tables in the database (excluding sqlite internals)
    pub fn table_count(&self) -> Result<u64> {
        let count: u64 = self
            .db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| anyhow!("failed to count tables: {}", e))?;
        Ok(count)
    }

    /// Count of trivia questions
    pub fn question_count(&self) -> Result<u64> {
        self.db.table_count("trivia_questions")
    }

    /// Count of trivia choices
    pub fn choice_count(&self) -> Result<u64> {
        self.db.table_count("trivia_choices")
    }

    /// Summaries of all seeded questions, ordered by code
    pub fn question_summaries(&self) -> Result<Vec<QuestionSummary>> {
        let mut stmt = self.db.conn.prepare(
            "SELECT q.code, q.category, q.difficulty, q.question_text, COUNT(c.id)
             FROM trivia_questions q
             LEFT JOIN trivia_choices c ON c.question_id = q.id
             GROUP BY q.id
             ORDER BY q.code",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(QuestionSummary {
                    code: row.get(0)?,
                    category: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    difficulty: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    question_text: row.get(3)?,
                    choices: row.get(4)?,
                })
            })
            .map_err(|e| anyhow!("failed to list questions: {}", e))?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Get an application metadata value
    pub fn app_meta(&self, key: &str) -> Result<Option<String>> {
        SchemaManager::new(&self.db.conn).get_app_meta(key)
    }

    /// Drop all trivia tables
    pub fn reset(&self) -> Result<()> {
        SchemaManager::new(&self.db.conn).reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_in_memory() {
        let db = TriviaDatabase::open_in_memory().unwrap();
        assert!(!db.is_initialized().unwrap());

        let report = db.initialize().unwrap();
        assert!(db.is_initialized().unwrap());
        assert_eq!(report.inserted, starter_questions().len());
        assert_eq!(db.table_count().unwrap(), 4);
    }

    #[test]
    fn test_initialize_twice_same_counts() {
        let db = TriviaDatabase::open_in_memory().unwrap();
        db.initialize().unwrap();
        let questions = db.question_count().unwrap();
        let choices = db.choice_count().unwrap();

        let second = db.initialize().unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, starter_questions().len());
        assert_eq!(db.question_count().unwrap(), questions);
        assert_eq!(db.choice_count().unwrap(), choices);
    }

    #[test]
    fn test_app_meta_written() {
        let db = TriviaDatabase::open_in_memory().unwrap();
        db.initialize().unwrap();

        assert_eq!(db.app_meta("version").unwrap().as_deref(), Some("0.2.0"));
    }

    #[test]
    fn test_question_summaries() {
        let db = TriviaDatabase::open_in_memory().unwrap();
        db.initialize().unwrap();

        let summaries = db.question_summaries().unwrap();
        assert_eq!(summaries.len(), starter_questions().len());

        let math = summaries
            .iter()
            .find(|s| s.code == "MATH_001")
            .unwrap();
        assert_eq!(math.category, "Math");
        assert_eq!(math.choices, 4);
        assert_eq!(math.question_text, "What is 9 × 7?");
    }

    #[test]
    fn test_reset_drops_schema() {
        let db = TriviaDatabase::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.reset().unwrap();
        assert!(!db.is_initialized().unwrap());
    }
}
