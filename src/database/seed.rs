//! Starter question catalog and idempotent seeding
//!
//! The seed catalog is a fixed, in-code list of starter questions applied on
//! every run. Idempotence rests on `trivia_questions.code` uniqueness: an
//! entry whose code already exists in the database is skipped entirely, never
//! updated in place.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};

/// A starter question in the fixed seed catalog
#[derive(Debug, Clone)]
pub struct SeedQuestion {
    /// Stable human-readable code, unique across the catalog
    pub code: &'static str,
    pub question_text: &'static str,
    /// Choice texts in display order
    pub choices: &'static [&'static str],
    /// Zero-based index of the correct choice
    pub correct_index: usize,
    pub category: &'static str,
    pub difficulty: &'static str,
    pub explanation: &'static str,
}

/// Counts from one reconciliation pass over the seed catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// The fixed starter catalog applied on every run
pub fn starter_questions() -> &'static [SeedQuestion] {
    STARTER_QUESTIONS
}

const STARTER_QUESTIONS: &[SeedQuestion] = &[
    SeedQuestion {
        code: "GEN_001",
        question_text: "What is the capital city of France?",
        choices: &["Berlin", "Madrid", "Paris", "Rome"],
        correct_index: 2,
        category: "Geography",
        difficulty: "Easy",
        explanation: "Paris is the capital and most populous city of France.",
    },
    SeedQuestion {
        code: "SCI_001",
        question_text: "Which planet is known as the Red Planet?",
        choices: &["Venus", "Mars", "Jupiter", "Mercury"],
        correct_index: 1,
        category: "Science",
        difficulty: "Easy",
        explanation: "Mars appears red due to iron oxide (rust) on its surface.",
    },
    SeedQuestion {
        code: "CS_001",
        question_text: "In programming, what does 'HTML' stand for?",
        choices: &[
            "HyperText Markup Language",
            "High Transfer Machine Language",
            "Hyperlink and Text Management Language",
            "Home Tool Markup Language",
        ],
        correct_index: 0,
        category: "Technology",
        difficulty: "Easy",
        explanation: "HTML stands for HyperText Markup Language.",
    },
    SeedQuestion {
        code: "HIS_001",
        question_text: "Who was the first President of the United States?",
        choices: &[
            "Thomas Jefferson",
            "John Adams",
            "George Washington",
            "James Madison",
        ],
        correct_index: 2,
        category: "History",
        difficulty: "Easy",
        explanation: "George Washington served as the first U.S. President from 1789 to 1797.",
    },
    SeedQuestion {
        code: "MATH_001",
        question_text: "What is 9 × 7?",
        choices: &["56", "63", "72", "49"],
        correct_index: 1,
        category: "Math",
        difficulty: "Easy",
        explanation: "9 times 7 equals 63.",
    },
    SeedQuestion {
        code: "POP_001",
        question_text: "Which movie features the quote: 'May the Force be with you'?",
        choices: &[
            "Star Wars",
            "The Matrix",
            "Harry Potter",
            "The Lord of the Rings",
        ],
        correct_index: 0,
        category: "Pop Culture",
        difficulty: "Easy",
        explanation: "The quote is famously associated with the Star Wars franchise.",
    },
];

/// Reconciles the seed catalog against the database
///
/// Expected to run on the same transaction as schema creation so that
/// structural creation and seeding commit together or not at all.
pub struct SeedReconciler<'a> {
    conn: &'a Connection,
}

impl<'a> SeedReconciler<'a> {
    /// Create a new seed reconciler for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Check whether a question with the given code already exists
    pub fn question_exists(&self, code: &str) -> Result<bool> {
        let result: Result<i64, _> = self.conn.query_row(
            "SELECT 1 FROM trivia_questions WHERE code = ?1 LIMIT 1",
            [code],
            |row| row.get(0),
        );

        match result {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(anyhow!("failed to look up question '{}': {}", code, e)),
        }
    }

    /// Insert a question row and one choice row per catalog choice
    ///
    /// Choice list order becomes `choice_order`; only the choice at
    /// `correct_index` gets the correctness flag.
    pub fn insert_question(&self, question: &SeedQuestion) -> Result<()> {
        // Malformed catalog entries are a bug in the static catalog,
        // not a runtime condition.
        debug_assert!(!question.choices.is_empty());
        debug_assert!(question.correct_index < question.choices.len());

        self.conn
            .execute(
                "INSERT INTO trivia_questions (code, question_text, category, difficulty, explanation)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    question.code,
                    question.question_text,
                    question.category,
                    question.difficulty,
                    question.explanation,
                ],
            )
            .map_err(|e| anyhow!("failed to insert question '{}': {}", question.code, e))?;

        let question_id = self.conn.last_insert_rowid();

        let mut stmt = self.conn.prepare(
            "INSERT INTO trivia_choices (question_id, choice_text, choice_order, is_correct)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (idx, choice_text) in question.choices.iter().enumerate() {
            let is_correct = i64::from(idx == question.correct_index);
            stmt.execute(params![question_id, choice_text, idx as i64, is_correct])
                .map_err(|e| {
                    anyhow!(
                        "failed to insert choice {} of question '{}': {}",
                        idx,
                        question.code,
                        e
                    )
                })?;
        }

        Ok(())
    }

    /// Apply the seed catalog, inserting only entries not already present
    pub fn apply(&self, catalog: &[SeedQuestion]) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for question in catalog {
            if self.question_exists(question.code)? {
                report.skipped += 1;
                continue;
            }
            self.insert_question(question)
                .with_context(|| format!("failed to seed question '{}'", question.code))?;
            report.inserted += 1;
        }

        Ok(report)
    }
}
