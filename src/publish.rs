//! Derived file publishing
//!
//! Two plaintext artifacts are maintained alongside the database work:
//!
//! - `db_visualizer/sqlite.env`, a shell-sourceable env file pointing the
//!   bundled DB viewer at the resolved database file. Always overwritten;
//!   derived, never authoritative.
//! - the reference file itself, rewritten only when path resolution had to
//!   fall back, so a hand-maintained file is never clobbered.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Directory (under the working directory) holding the viewer env file
pub const ENV_DIR_NAME: &str = "db_visualizer";

/// Name of the viewer env file
pub const ENV_FILE_NAME: &str = "sqlite.env";

/// Write `db_visualizer/sqlite.env` under `base_dir`
///
/// Creates the directory if needed and overwrites any previous content with
/// a single `export SQLITE_DB="..."` line. Returns the written file's path.
pub fn write_visualizer_env(base_dir: &Path, db_path: &Path) -> Result<PathBuf> {
    let dir = base_dir.join(ENV_DIR_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("could not create directory {}", dir.display()))?;

    let env_path = dir.join(ENV_FILE_NAME);
    let content = format!("export SQLITE_DB=\"{}\"\n", db_path.display());
    std::fs::write(&env_path, content)
        .with_context(|| format!("could not write {}", env_path.display()))?;

    Ok(env_path)
}

/// Rewrite the reference file with the resolved database path
///
/// The written `# File path:` line round-trips through
/// [`crate::config::read_reference_path`].
pub fn write_reference_file(reference_file: &Path, db_path: &Path) -> Result<()> {
    let content = format!(
        "# SQLite connection reference\n\
         # Connection string: sqlite:///{path}\n\
         # File path: {path}\n",
        path = db_path.display()
    );

    std::fs::write(reference_file, content)
        .with_context(|| format!("could not write {}", reference_file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::read_reference_path;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_visualizer_env() {
        let dir = TempDir::new().unwrap();
        let db_path = Path::new("/data/myapp.db");

        let env_path = write_visualizer_env(dir.path(), db_path).unwrap();
        assert_eq!(env_path, dir.path().join(ENV_DIR_NAME).join(ENV_FILE_NAME));

        let content = fs::read_to_string(&env_path).unwrap();
        assert_eq!(content, "export SQLITE_DB=\"/data/myapp.db\"\n");
    }

    #[test]
    fn test_write_visualizer_env_overwrites() {
        let dir = TempDir::new().unwrap();

        write_visualizer_env(dir.path(), Path::new("/old.db")).unwrap();
        let env_path = write_visualizer_env(dir.path(), Path::new("/new.db")).unwrap();

        let content = fs::read_to_string(&env_path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert_eq!(content, "export SQLITE_DB=\"/new.db\"\n");
    }

    #[test]
    fn test_reference_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let reference_file = dir.path().join("db_connection.txt");
        let db_path = Path::new("/data/myapp.db");

        write_reference_file(&reference_file, db_path).unwrap();

        let stored = read_reference_path(&reference_file).unwrap();
        assert_eq!(stored, db_path);
    }
}
