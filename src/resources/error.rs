//! Typed error variants for conflict resolution.
//!
//! [`ResourceError`] covers the destructive I/O performed while clearing a
//! conflicting target: renaming it to a backup, or deleting it.  Each
//! variant carries the path that failed so that partial removals can be
//! diagnosed; callers convert to [`anyhow::Error`] via `?`.
//! [`ResourceError::SourceInsideTarget`] is raised before any I/O happens.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while backing up or removing a target.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The target could not be renamed to its backup path.
    #[error("backup of {} failed: {source}", .path.display())]
    BackupFailed {
        /// Path that was being backed up.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An entry could not be deleted.
    #[error("removal of {} failed: {source}", .path.display())]
    RemovalFailed {
        /// Path of the entry that could not be deleted.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Permissions of an entry could not be reset before deletion.
    #[error("permission reset on {} failed: {source}", .path.display())]
    PermissionReset {
        /// Path of the entry whose mode could not be changed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The source is the target itself or lies inside it, so clearing the
    /// target would take the source with it.
    #[error("source {} lies inside target {}", .source_path.display(), .path.display())]
    SourceInsideTarget {
        /// Target that was left untouched.
        path: PathBuf,
        /// Declared source, resolved.
        source_path: PathBuf,
    },
}
