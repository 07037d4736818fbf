//! File-system resource helpers: parent creation, backups, recursive removal.
use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::resources::error::ResourceError;

/// Upper bound on the `-N` disambiguators tried by [`backup_path`].
pub const MAX_BACKUP_SUFFIX: u32 = 1000;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Current local time in ISO 8601 with offset, second precision
/// (`2024-05-01T13:37:00+02:00`), used to name backups.
#[must_use]
pub fn backup_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}

/// First free sibling path of the form `<target>.<stamp>.bak`.
///
/// If that name is taken, `<target>.<stamp>-1.bak`, `-2`, ... are tried up
/// to [`MAX_BACKUP_SUFFIX`].  Occupancy is checked without following links,
/// so a dangling symlink also blocks a name.  Returns `None` when every
/// candidate is taken.
#[must_use]
pub fn backup_path(target: &Path, stamp: &str) -> Option<PathBuf> {
    let mut stem: OsString = target.as_os_str().to_os_string();
    stem.push(".");
    stem.push(stamp);

    let candidate = |suffix: &str| {
        let mut name = stem.clone();
        name.push(suffix);
        name.push(".bak");
        PathBuf::from(name)
    };

    std::iter::once(candidate(""))
        .chain((1..=MAX_BACKUP_SUFFIX).map(|n| candidate(&format!("-{n}"))))
        .find(|p| p.symlink_metadata().is_err())
}

/// Rename `target` to a fresh timestamped backup path and return it.
///
/// # Errors
///
/// Returns [`ResourceError::BackupFailed`] if no free backup name exists or
/// the rename fails.
pub fn backup(target: &Path) -> Result<PathBuf, ResourceError> {
    let dest = backup_path(target, &backup_timestamp()).ok_or_else(|| {
        ResourceError::BackupFailed {
            path: target.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "no free backup name"),
        }
    })?;

    std::fs::rename(target, &dest).map_err(|source| ResourceError::BackupFailed {
        path: target.to_path_buf(),
        source,
    })?;
    tracing::debug!("moved {} to {}", target.display(), dest.display());
    Ok(dest)
}

/// Delete `path` and everything below it, equivalent to `rm -rf`.
///
/// A non-directory (including a symlink to a directory, which is never
/// followed) is made writable and unlinked.  A directory is walked twice:
/// first top-down to make every entry accessible, so a read-only or
/// unsearchable descendant cannot block the second pass; then bottom-up to
/// delete files before the directories that contain them.
///
/// There is no rollback: if an entry fails, whatever was already deleted
/// stays deleted.
///
/// # Errors
///
/// Returns [`ResourceError::PermissionReset`] or
/// [`ResourceError::RemovalFailed`] naming the first entry that failed.
pub fn remove_recursive(path: &Path) -> Result<(), ResourceError> {
    let meta = std::fs::symlink_metadata(path).map_err(|source| removal_failed(path, source))?;

    if !meta.is_dir() {
        if !meta.file_type().is_symlink() {
            make_accessible(path)?;
        }
        std::fs::remove_file(path).map_err(|source| removal_failed(path, source))?;
        tracing::debug!("removed {}", path.display());
        return Ok(());
    }

    make_tree_accessible(path)?;

    for entry in WalkDir::new(path).follow_links(false).contents_first(true) {
        let entry = entry.map_err(|e| {
            let at = e.path().unwrap_or(path).to_path_buf();
            removal_failed(&at, e.into())
        })?;
        let result = if entry.file_type().is_dir() {
            std::fs::remove_dir(entry.path())
        } else {
            std::fs::remove_file(entry.path())
        };
        result.map_err(|source| removal_failed(entry.path(), source))?;
    }
    tracing::debug!("removed tree {}", path.display());
    Ok(())
}

/// Pre-order pass: reset `dir` before reading it, then every entry below.
fn make_tree_accessible(dir: &Path) -> Result<(), ResourceError> {
    make_accessible(dir)?;
    let entries = std::fs::read_dir(dir).map_err(|source| permission_reset(dir, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| permission_reset(dir, source))?;
        let child = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|source| permission_reset(&child, source))?;
        if file_type.is_dir() {
            make_tree_accessible(&child)?;
        } else if !file_type.is_symlink() {
            make_accessible(&child)?;
        }
    }
    Ok(())
}

/// Grant read, write and execute to everyone on `path`.
#[cfg(unix)]
fn make_accessible(path: &Path) -> Result<(), ResourceError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o777))
        .map_err(|source| permission_reset(path, source))
}

/// Clear the read-only attribute on `path`.
#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_accessible(path: &Path) -> Result<(), ResourceError> {
    let mut perms = std::fs::metadata(path)
        .map_err(|source| permission_reset(path, source))?
        .permissions();
    perms.set_readonly(false);
    std::fs::set_permissions(path, perms).map_err(|source| permission_reset(path, source))
}

fn removal_failed(path: &Path, source: io::Error) -> ResourceError {
    ResourceError::RemovalFailed {
        path: path.to_path_buf(),
        source,
    }
}

fn permission_reset(path: &Path, source: io::Error) -> ResourceError {
    ResourceError::PermissionReset {
        path: path.to_path_buf(),
        source,
    }
}
