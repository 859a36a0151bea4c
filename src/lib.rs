#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Triviadb - SQLite bootstrap utility for the interactive trivia challenge
//!
//! Triviadb owns the lifecycle of the application's SQLite database file:
//! it resolves the authoritative file path from a plaintext reference file,
//! creates the schema if absent, seeds a fixed catalog of starter questions
//! idempotently, and publishes a shell-sourceable env file for the bundled
//! DB viewer.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - **[`config`]**: Authoritative database path resolution from the
//!   reference file (`db_connection.txt`), with fallback handling.
//! - **[`database`]**: All database functionality
//!   - `connection`: SQLite `DatabaseConn` wrapper
//!   - `schema`: table/index definitions and idempotent creation
//!   - `seed`: the starter question catalog and its reconciler
//! - **[`publish`]**: Derived file outputs (the viewer env file and the
//!   reference-file rewrite after a path fallback).
//! - **[`setup`]**: The one-shot orchestrator tying the above together.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use triviadb::setup::{run_init, InitOptions};
//!
//! let opts = InitOptions::in_dir(std::env::current_dir()?);
//! let report = run_init(&opts)?;
//! println!("questions: {}", report.question_count);
//! ```

pub mod config;
pub mod database;
pub mod publish;
pub mod setup;

// =============================================================================
// Path resolution
// =============================================================================

pub use config::{
    read_reference_path, resolve_db_path, ResolvedDbPath, DB_NAME_FALLBACK, REFERENCE_FILE_DEFAULT,
};

// =============================================================================
// Database types
// =============================================================================

pub use database::{
    starter_questions, DatabaseConn, QuestionSummary, SchemaDefinitions, SchemaManager,
    SeedQuestion, SeedReconciler, SeedReport, TriviaDatabase, APP_METADATA,
};

// =============================================================================
// Derived file outputs and orchestration
// =============================================================================

pub use publish::{write_reference_file, write_visualizer_env, ENV_DIR_NAME, ENV_FILE_NAME};
pub use setup::{run_init, InitOptions, InitReport};
