//! Authoritative database path resolution
//!
//! The SQLite database file path is not hardcoded; it is read from a
//! plaintext reference file (by default `db_connection.txt`) containing a
//! line of the form `# File path: <value>`. The reference file is treated
//! as the single authoritative source for the path, hand-maintained unless
//! a fallback forces a rewrite.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default database file name used when the reference file is missing or
/// malformed.
pub const DB_NAME_FALLBACK: &str = "myapp.db";

/// Default reference file name, resolved relative to the working directory.
pub const REFERENCE_FILE_DEFAULT: &str = "db_connection.txt";

/// Line prefix marking the authoritative path inside the reference file.
const FILE_PATH_PREFIX: &str = "# File path:";

/// Outcome of resolving the database path.
#[derive(Debug, Clone)]
pub struct ResolvedDbPath {
    /// Absolute path to the SQLite database file.
    pub path: PathBuf,

    /// Whether the fallback path was used because the reference file could
    /// not be read. The orchestrator rewrites the reference file afterwards
    /// if and only if this is set.
    pub used_fallback: bool,
}

/// Read the authoritative database path from the reference file.
///
/// Returns the raw path value from the first `# File path: <value>` line.
/// Fails if the file cannot be read or contains no such line; callers are
/// expected to treat this as recoverable and fall back to
/// [`DB_NAME_FALLBACK`].
pub fn read_reference_path(reference_file: &Path) -> Result<PathBuf> {
    let content = std::fs::read_to_string(reference_file).with_context(|| {
        format!(
            "could not read {}: it must exist and contain a '# File path: ...' line",
            reference_file.display()
        )
    })?;

    content
        .lines()
        .find_map(|line| line.strip_prefix(FILE_PATH_PREFIX))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            anyhow!(
                "{} does not contain an authoritative '# File path: ...' line",
                reference_file.display()
            )
        })
}

/// Return `path` unchanged when absolute, otherwise resolve it under
/// `base_dir`.
pub fn absolutize(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Resolve the database path from the reference file.
///
/// On a configuration error (missing file, missing line) this warns and
/// falls back to [`DB_NAME_FALLBACK`] under `base_dir` instead of failing,
/// flagging the fallback so the caller knows to rewrite the reference file.
pub fn resolve_db_path(reference_file: &Path, base_dir: &Path) -> ResolvedDbPath {
    match read_reference_path(reference_file) {
        Ok(path) => ResolvedDbPath {
            path: absolutize(&path, base_dir),
            used_fallback: false,
        },
        Err(e) => {
            warn!("{:#}", e);
            warn!("falling back to local database file: {}", DB_NAME_FALLBACK);
            ResolvedDbPath {
                path: base_dir.join(DB_NAME_FALLBACK),
                used_fallback: true,
            }
        }
    }
}
