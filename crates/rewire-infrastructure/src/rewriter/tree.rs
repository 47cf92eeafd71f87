//! Directory rewriting pass
//!
//! Walks a directory tree, rewrites every module file whose injection-point
//! reads need rewriting and replaces it atomically. A file is read completely
//! before anything is written, and the replacement is staged in a temporary
//! file in the same directory so readers never observe a partial module.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rewire_application::ModuleRewriter;
use rewire_domain::error::{Error, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::report::{FileOutcome, RewriteReport};
use crate::config::RewriterConfig;
use crate::error_ext::ErrorContext;

/// Applies [`ModuleRewriter`] to every module file below a root directory
#[derive(Debug, Clone)]
pub struct TreeRewriter {
    rewriter: ModuleRewriter,
    extension: String,
    fail_fast: bool,
    follow_links: bool,
}

impl Default for TreeRewriter {
    fn default() -> Self {
        Self::new(&RewriterConfig::default())
    }
}

impl TreeRewriter {
    /// Create a tree rewriter from settings
    pub fn new(config: &RewriterConfig) -> Self {
        Self {
            rewriter: ModuleRewriter::new().with_inject_marker(config.inject_marker.clone()),
            extension: config.extension.clone(),
            fail_fast: config.fail_fast,
            follow_links: config.follow_links,
        }
    }

    /// Whether `path` carries the configured module extension
    pub fn is_module_file(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension.as_str())
    }

    /// Rewrite every module file below `root`
    ///
    /// Per-file failures are recorded in the report. With `fail_fast` the
    /// walk stops at the first one. Only an unusable root is an error.
    pub fn rewrite_tree(&self, root: &Path) -> Result<RewriteReport> {
        if !root.is_dir() {
            return Err(Error::io(format!(
                "Rewrite root is not a directory: {}",
                root.display()
            )));
        }

        let mut report = RewriteReport::new(root);
        let walker = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let (path, outcome) = match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() || !self.is_module_file(entry.path()) {
                        continue;
                    }
                    let path = entry.into_path();
                    let outcome = self.rewrite_file(&path);
                    (path, outcome)
                }
                Err(err) => {
                    let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    (path, Err(Error::io(format!("Failed to walk directory: {err}"))))
                }
            };

            match outcome {
                Ok(outcome) => report.push(path, outcome),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Failed to rewrite module");
                    report.push(
                        path,
                        FileOutcome::Failed {
                            error: err.to_string(),
                        },
                    );
                    if self.fail_fast {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        info!(
            root = %root.display(),
            rewritten = report.rewritten_count(),
            unchanged = report.unchanged_count(),
            failed = report.failure_count(),
            "Rewrite pass finished"
        );
        Ok(report)
    }

    /// Rewrite a single module file in place
    ///
    /// The file is only replaced when at least one site was rewritten.
    pub fn rewrite_file(&self, path: &Path) -> Result<FileOutcome> {
        let bytes =
            fs::read(path).io_context(format!("Failed to read module {}", path.display()))?;
        let (rewritten, summary) = self
            .rewriter
            .rewrite_bytes(&bytes)
            .map_err(|e| Error::rewrite_with_source(format!("{}: {e}", path.display()), e))?;

        if !summary.is_modified() {
            debug!(path = %path.display(), "No injection-point reads to rewrite");
            return Ok(FileOutcome::Unchanged(summary));
        }

        replace_atomically(path, &rewritten)?;
        debug!(
            path = %path.display(),
            sites = summary.rewritten_sites,
            "Rewrote module file"
        );
        Ok(FileOutcome::Rewritten(summary))
    }
}

/// Replace `path` with `contents` via a sibling temporary file
fn replace_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir: PathBuf = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut staged = NamedTempFile::new_in(&dir).io_context(format!(
        "Failed to create temporary file in {}",
        dir.display()
    ))?;
    staged
        .write_all(contents)
        .io_context(format!("Failed to stage {}", path.display()))?;
    staged
        .as_file()
        .sync_all()
        .io_context(format!("Failed to flush {}", path.display()))?;

    let permissions = fs::metadata(path)
        .io_context(format!("Failed to stat {}", path.display()))?
        .permissions();
    fs::set_permissions(staged.path(), permissions)
        .io_context(format!("Failed to copy permissions to {}", path.display()))?;

    staged
        .persist(path)
        .map_err(|e| e.error)
        .io_context(format!("Failed to replace {}", path.display()))?;
    Ok(())
}
