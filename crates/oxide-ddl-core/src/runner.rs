//! Script execution.
//!
//! [`ScriptRunner`] applies a directory of `*.sql` files to a
//! [`ScriptTarget`]. Files run in file-name order (numeric prefixes encode
//! the intended order: domains, then tables, then routines). Every statement
//! is its own unit of work, and the first failure stops the run.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{DdlError, Result};
use crate::script::{split_statements, strip_bom};

/// Execution surface of a database.
#[allow(async_fn_in_trait)]
pub trait ScriptTarget {
    /// Error type for execution failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes `statement` as one unit of work.
    ///
    /// Implementations begin a transaction, execute, and commit. On failure
    /// they roll that transaction back and return the engine error.
    async fn execute_unit(&mut self, statement: &str) -> std::result::Result<(), Self::Error>;
}

/// What a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Script files processed.
    pub files: usize,
    /// Statements executed (or printed, for a plan).
    pub statements: usize,
}

/// Runs the scripts of one directory.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    directory: PathBuf,
    files: Vec<PathBuf>,
}

impl ScriptRunner {
    /// Finds the `*.sql` files in `directory`, sorted by file name.
    ///
    /// Fails when the directory is missing or holds no scripts, before any
    /// database work is attempted.
    pub fn discover(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(DdlError::ScriptDirectoryNotFound(directory));
        }

        let entries = std::fs::read_dir(&directory).map_err(|e| DdlError::io(&directory, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| DdlError::io(&directory, e))?.path();
            if path.is_file() && is_sql_file(&path) {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(DdlError::ScriptDirectoryEmpty(directory));
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!(
            directory = %directory.display(),
            count = files.len(),
            "Discovered scripts"
        );

        Ok(Self { directory, files })
    }

    /// Returns the scripts directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the script files in execution order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Executes every statement of every file against `target`.
    ///
    /// Stops at the first failing statement; nothing after it runs.
    pub async fn run<T: ScriptTarget>(&self, target: &mut T) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for file in &self.files {
            info!(file = %display_name(file), "Executing script");
            let script = read_script(file)?;

            for statement in split_statements(&script) {
                debug!(sql = %statement, "Executing statement");
                target.execute_unit(statement).await.map_err(|e| {
                    DdlError::StatementExecution {
                        file: file.clone(),
                        statement: statement.to_string(),
                        source: Box::new(e),
                    }
                })?;
                summary.statements += 1;
            }
            summary.files += 1;
        }

        info!(
            files = summary.files,
            statements = summary.statements,
            "Scripts executed"
        );
        Ok(summary)
    }

    /// Prints the statements a run would execute, without executing them.
    pub fn print_plan(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for file in &self.files {
            let script = read_script(file)?;
            println!("-- {}", display_name(file));
            for statement in split_statements(&script) {
                println!("{statement}\n");
                summary.statements += 1;
            }
            summary.files += 1;
        }
        Ok(summary)
    }
}

/// Reads a script, dropping a leading byte order mark.
fn read_script(path: &Path) -> Result<String> {
    let script = std::fs::read_to_string(path).map_err(|e| DdlError::io(path, e))?;
    Ok(strip_bom(&script).to_string())
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("statement rejected")]
    struct Rejected;

    /// Records committed statements; fails any statement containing `FAIL`.
    #[derive(Default)]
    struct RecordingTarget {
        committed: Vec<String>,
        attempts: usize,
    }

    impl ScriptTarget for RecordingTarget {
        type Error = Rejected;

        async fn execute_unit(&mut self, statement: &str) -> std::result::Result<(), Rejected> {
            self.attempts += 1;
            if statement.contains("FAIL") {
                return Err(Rejected);
            }
            self.committed.push(statement.to_string());
            Ok(())
        }
    }

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_discover_sorts_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "03_PROCEDURES.sql", "");
        write(dir.path(), "01_DOMAINS.sql", "");
        write(dir.path(), "02_TABLES.SQL", "");
        write(dir.path(), "notes.txt", "");
        std::fs::create_dir(dir.path().join("04_nested.sql")).unwrap();

        let runner = ScriptRunner::discover(dir.path()).unwrap();
        let names: Vec<_> = runner.files().iter().map(|f| display_name(f)).collect();
        assert_eq!(names, vec!["01_DOMAINS.sql", "02_TABLES.SQL", "03_PROCEDURES.sql"]);
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "readme.md", "");
        assert!(matches!(
            ScriptRunner::discover(dir.path()),
            Err(DdlError::ScriptDirectoryEmpty(_))
        ));
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ScriptRunner::discover(dir.path().join("missing")),
            Err(DdlError::ScriptDirectoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_run_executes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "02_TABLES.sql", "CREATE TABLE T (X D_X);");
        write(dir.path(), "01_DOMAINS.sql", "CREATE DOMAIN D_X AS INTEGER;\n;\n");
        write(
            dir.path(),
            "03_PROCEDURES.sql",
            "SET TERM $$ ;\nCREATE PROCEDURE P AS BEGIN EXIT; END\n$$\nSET TERM ; $$\n",
        );

        let mut target = RecordingTarget::default();
        let summary = ScriptRunner::discover(dir.path())
            .unwrap()
            .run(&mut target)
            .await
            .unwrap();

        assert_eq!(
            target.committed,
            vec![
                "CREATE DOMAIN D_X AS INTEGER",
                "CREATE TABLE T (X D_X)",
                "CREATE PROCEDURE P AS BEGIN EXIT; END",
            ]
        );
        assert_eq!(
            summary,
            RunSummary {
                files: 3,
                statements: 3
            }
        );
    }

    #[tokio::test]
    async fn test_run_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "01_A.sql", "CREATE TABLE A (X INTEGER);\nFAIL HERE;\nCREATE TABLE C (Z INTEGER);");
        write(dir.path(), "02_B.sql", "CREATE TABLE B (Y INTEGER);");

        let mut target = RecordingTarget::default();
        let err = ScriptRunner::discover(dir.path())
            .unwrap()
            .run(&mut target)
            .await
            .unwrap_err();

        assert_eq!(target.committed, vec!["CREATE TABLE A (X INTEGER)"]);
        assert_eq!(target.attempts, 2);
        match err {
            DdlError::StatementExecution {
                file, statement, ..
            } => {
                assert!(file.ends_with("01_A.sql"));
                assert_eq!(statement, "FAIL HERE");
            }
            other => panic!("Expected StatementExecution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stray_directive_is_not_executed() {
        let dir = tempfile::tempdir().unwrap();
        // Closed by the wrong terminator, so it stays in the body.
        write(dir.path(), "01.sql", "SET TERM ^ $$;\nCREATE TABLE A (X INTEGER);");

        let mut target = RecordingTarget::default();
        ScriptRunner::discover(dir.path())
            .unwrap()
            .run(&mut target)
            .await
            .unwrap();
        assert_eq!(target.committed, vec!["CREATE TABLE A (X INTEGER)"]);
    }

    #[tokio::test]
    async fn test_run_skips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "01_DOMAINS.sql",
            "\u{feff}CREATE DOMAIN D_ID AS INTEGER;\nCREATE TABLE T (X D_ID);\n",
        );

        let mut target = RecordingTarget::default();
        ScriptRunner::discover(dir.path())
            .unwrap()
            .run(&mut target)
            .await
            .unwrap();
        assert_eq!(
            target.committed,
            vec!["CREATE DOMAIN D_ID AS INTEGER", "CREATE TABLE T (X D_ID)"]
        );
    }

    #[test]
    fn test_read_script_strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "01.sql", "\u{feff}A;");
        assert_eq!(read_script(&dir.path().join("01.sql")).unwrap(), "A;");
        write(dir.path(), "02.sql", "B;");
        assert_eq!(read_script(&dir.path().join("02.sql")).unwrap(), "B;");
    }

    #[test]
    fn test_print_plan_counts_statements() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "01.sql", "A; B;");
        write(dir.path(), "02.sql", "C;");
        let summary = ScriptRunner::discover(dir.path()).unwrap().print_plan().unwrap();
        assert_eq!(
            summary,
            RunSummary {
                files: 2,
                statements: 3
            }
        );
    }
}
