use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tabled::settings::Style;
use tabled::Table;
use tracing::Level;

use triviadb::config::{absolutize, resolve_db_path, REFERENCE_FILE_DEFAULT};
use triviadb::database::{QuestionSummary, TriviaDatabase};
use triviadb::publish::{ENV_DIR_NAME, ENV_FILE_NAME};
use triviadb::setup::{run_init, InitOptions, InitReport};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Reference file holding the authoritative database path
    #[clap(short, long, default_value = REFERENCE_FILE_DEFAULT)]
    reference_file: PathBuf,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the trivia schema and seed starter questions (safe to re-run)
    Init {
        /// Output the run report as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show database status and the seeded questions
    Status {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Drop all trivia tables
    Reset {
        /// Skip confirmation
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Serialize)]
struct StatusReport {
    reference_file: PathBuf,
    used_fallback: bool,
    db_path: PathBuf,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified_at: Option<String>,
    schema_initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    table_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    question_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    choice_count: Option<u64>,
    questions: Vec<QuestionSummary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // WARN by default so recoverable fallbacks stay visible.
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::WARN })
        .init();

    let base_dir = std::env::current_dir()?;
    let reference_file = absolutize(&cli.reference_file, &base_dir);

    match cli.command {
        Commands::Init { json } => run_init_command(reference_file, base_dir, json),
        Commands::Status { json } => run_status_command(reference_file, base_dir, json),
        Commands::Reset { yes } => run_reset_command(reference_file, base_dir, yes),
    }
}

fn run_init_command(reference_file: PathBuf, base_dir: PathBuf, json: bool) -> Result<()> {
    if !json {
        println!("Starting SQLite setup (trivia schema + seed)...");
    }

    let opts = InitOptions {
        reference_file,
        base_dir,
    };
    let report = run_init(&opts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_init_report(&report);
    Ok(())
}

fn print_init_report(report: &InitReport) {
    println!("Database is accessible and working.");
    println!("Database statistics:");
    println!("  Tables: {}", report.table_count);
    println!("  Trivia questions: {}", report.question_count);
    println!("  Trivia choices: {}", report.choice_count);
    println!(
        "  Seeded this run: {} (skipped {} already present)",
        report.questions_inserted, report.questions_skipped
    );

    println!();
    println!("SQLite setup complete!");
    println!("Database file: {}", report.db_path.display());
    if report.env_file.is_some() {
        println!(
            "To use the DB viewer, run: source {}/{}",
            ENV_DIR_NAME, ENV_FILE_NAME
        );
    }
    if report.reference_rewritten {
        println!("Authoritative path saved to the reference file.");
    }
}

fn run_status_command(reference_file: PathBuf, base_dir: PathBuf, json: bool) -> Result<()> {
    let resolved = resolve_db_path(&reference_file, &base_dir);
    let db_path = resolved.path;
    let exists = db_path.exists();

    let (size_bytes, modified_at) = match std::fs::metadata(&db_path) {
        Ok(meta) => {
            let modified = meta.modified().ok().map(|mtime| {
                chrono::DateTime::<chrono::Local>::from(mtime)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            });
            (Some(meta.len()), modified)
        }
        Err(_) => (None, None),
    };

    let (schema_initialized, table_count, question_count, choice_count, questions) = if exists {
        let db = TriviaDatabase::open(&db_path)?;
        if db.is_initialized()? {
            (
                true,
                Some(db.table_count()?),
                Some(db.question_count()?),
                Some(db.choice_count()?),
                db.question_summaries()?,
            )
        } else {
            (false, Some(db.table_count()?), None, None, vec![])
        }
    } else {
        (false, None, None, None, vec![])
    };

    let report = StatusReport {
        reference_file,
        used_fallback: resolved.used_fallback,
        db_path,
        exists,
        size_bytes,
        modified_at,
        schema_initialized,
        table_count,
        question_count,
        choice_count,
        questions,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_status_report(&report);
    Ok(())
}

fn print_status_report(report: &StatusReport) {
    println!("Trivia Database Status");
    println!("======================\n");

    println!("Reference file:  {}", report.reference_file.display());
    if report.used_fallback {
        println!("                 (unreadable, fallback path shown below)");
    }
    println!("Database file:   {}", report.db_path.display());
    println!(
        "Status:          {}",
        if report.exists { "exists" } else { "not created" }
    );
    if let Some(size) = report.size_bytes {
        println!("Size:            {} bytes", size);
    }
    if let Some(modified) = &report.modified_at {
        println!("Last modified:   {}", modified);
    }
    println!(
        "Schema:          {}",
        if report.schema_initialized {
            "initialized"
        } else {
            "not initialized"
        }
    );

    if let (Some(tables), Some(questions), Some(choices)) = (
        report.table_count,
        report.question_count,
        report.choice_count,
    ) {
        println!();
        println!("Tables:           {}", tables);
        println!("Trivia questions: {}", questions);
        println!("Trivia choices:   {}", choices);
    }

    if !report.questions.is_empty() {
        println!();
        println!(
            "{}",
            Table::new(&report.questions).with(Style::rounded())
        );
    }
}

fn run_reset_command(reference_file: PathBuf, base_dir: PathBuf, yes: bool) -> Result<()> {
    let resolved = resolve_db_path(&reference_file, &base_dir);
    let db_path = resolved.path;

    if !db_path.exists() {
        println!("No database file at {}, nothing to reset.", db_path.display());
        return Ok(());
    }

    if !yes {
        eprintln!(
            "This drops all trivia tables in {}. Re-run with --yes to confirm.",
            db_path.display()
        );
        std::process::exit(1);
    }

    let db = TriviaDatabase::open(&db_path)?;
    db.reset()?;
    println!("Dropped all trivia tables in {}.", db_path.display());
    println!("Run `triviadb init` to recreate the schema and seed data.");
    Ok(())
}
