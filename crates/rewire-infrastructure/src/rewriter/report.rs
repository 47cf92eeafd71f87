//! Outcome of a directory rewriting pass

use std::fmt;
use std::path::PathBuf;

use rewire_application::RewriteSummary;
use serde::Serialize;

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// At least one site was rewritten and the file was replaced
    Rewritten(RewriteSummary),
    /// Nothing to rewrite; the file was left as is
    Unchanged(RewriteSummary),
    /// The file could not be read, decoded, rewritten or replaced
    Failed {
        /// Error description
        error: String,
    },
}

/// Outcome for a single path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File that was processed
    pub path: PathBuf,
    /// What happened to it
    pub outcome: FileOutcome,
}

/// Result of walking one directory tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// Root of the walk
    pub root: PathBuf,
    /// Per-file outcomes in walk order
    pub files: Vec<FileReport>,
    /// Whether the walk stopped early on a failure
    pub aborted: bool,
}

impl RewriteReport {
    /// Empty report for `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Record an outcome
    pub fn push(&mut self, path: PathBuf, outcome: FileOutcome) {
        self.files.push(FileReport { path, outcome });
    }

    /// Files that were rewritten
    pub fn rewritten(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Rewritten(_)))
    }

    /// Files that failed
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
    }

    /// Number of rewritten files
    pub fn rewritten_count(&self) -> usize {
        self.rewritten().count()
    }

    /// Number of files left unchanged
    pub fn unchanged_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Unchanged(_)))
            .count()
    }

    /// Number of failed files
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Total call sites rewritten across all files
    pub fn rewritten_sites(&self) -> usize {
        self.files
            .iter()
            .map(|f| match &f.outcome {
                FileOutcome::Rewritten(summary) => summary.rewritten_sites,
                _ => 0,
            })
            .sum()
    }

    /// Whether every file was processed successfully
    pub fn is_success(&self) -> bool {
        !self.aborted && self.failure_count() == 0
    }
}

impl fmt::Display for RewriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} rewritten ({} sites), {} unchanged, {} failed{}",
            self.root.display(),
            self.rewritten_count(),
            self.rewritten_sites(),
            self.unchanged_count(),
            self.failure_count(),
            if self.aborted { ", aborted" } else { "" }
        )?;
        for file in self.failures() {
            if let FileOutcome::Failed { error } = &file.outcome {
                writeln!(f, "  {}: {error}", file.path.display())?;
            }
        }
        Ok(())
    }
}
