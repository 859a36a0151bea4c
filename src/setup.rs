//! One-shot initialization orchestration
//!
//! Sequence: resolve the database path, open the connection, create schema
//! and seed inside one transaction, gather counts, then publish the derived
//! files. The two filesystem side effects run only after the database work
//! has committed, and their failures are warnings rather than errors.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{resolve_db_path, REFERENCE_FILE_DEFAULT};
use crate::database::TriviaDatabase;
use crate::publish::{write_reference_file, write_visualizer_env};

/// Options for one initialization run
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Reference file holding the authoritative database path
    pub reference_file: PathBuf,

    /// Directory that relative paths and derived files resolve against
    /// (the working directory when invoked from the CLI)
    pub base_dir: PathBuf,
}

impl InitOptions {
    /// Options rooted at `base_dir` with the default reference file name
    pub fn in_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            reference_file: base_dir.join(REFERENCE_FILE_DEFAULT),
            base_dir,
        }
    }
}

/// Summary of one initialization run
#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    /// Absolute path of the database file
    pub db_path: PathBuf,

    /// Whether the database file existed before this run
    pub db_existed: bool,

    /// Whether the fallback path was used (reference file missing/malformed)
    pub used_fallback: bool,

    pub table_count: u64,
    pub question_count: u64,
    pub choice_count: u64,
    pub questions_inserted: usize,
    pub questions_skipped: usize,

    /// Path of the written viewer env file, if the write succeeded
    pub env_file: Option<PathBuf>,

    /// Whether the reference file was rewritten (fallback runs only)
    pub reference_rewritten: bool,
}

/// Run the full initialization sequence
///
/// Database errors propagate and abort before commit; path resolution and
/// derived-file failures are recovered locally and surfaced as warnings.
pub fn run_init(opts: &InitOptions) -> Result<InitReport> {
    let resolved = resolve_db_path(&opts.reference_file, &opts.base_dir);
    let db_path = resolved.path;

    let db_existed = db_path.exists();
    if db_existed {
        info!("database already exists at {}", db_path.display());
    } else {
        info!("creating new database at {}", db_path.display());
    }

    ensure_parent_dir(&db_path)?;

    // Scope the connection so it is closed before the file-system side
    // effects run.
    let (seed, table_count, question_count, choice_count) = {
        let db = TriviaDatabase::open(&db_path)?;
        let seed = db.initialize()?;
        (
            seed,
            db.table_count()?,
            db.question_count()?,
            db.choice_count()?,
        )
    };

    let env_file = match write_visualizer_env(&opts.base_dir, &db_path) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("could not write viewer env file: {:#}", e);
            None
        }
    };

    let mut reference_rewritten = false;
    if resolved.used_fallback {
        // The reference file stays hand-maintained unless we had to fall
        // back, in which case the resolved path becomes authoritative.
        match write_reference_file(&opts.reference_file, &db_path) {
            Ok(()) => {
                reference_rewritten = true;
                info!(
                    "connection information saved to {}",
                    opts.reference_file.display()
                );
            }
            Err(e) => warn!("could not save connection info: {:#}", e),
        }
    }

    Ok(InitReport {
        db_path,
        db_existed,
        used_fallback: resolved.used_fallback,
        table_count,
        question_count,
        choice_count,
        questions_inserted: seed.inserted,
        questions_skipped: seed.skipped,
        env_file,
        reference_rewritten,
    })
}

fn ensure_parent_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "could not create database directory {}",
                parent.display()
            )
        })?;
    }
    Ok(())
}
