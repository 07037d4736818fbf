//! Symlink resource: the desired link and the single-attempt reconciler.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::{LinkClassification, ReconcileOutcome, helpers, paths, state};

/// Directory against which a relative declared source is made absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceBase {
    /// Resolve against the working directory (the mapping file's directory).
    #[default]
    WorkingDir,
    /// Resolve against the directory containing the link, the way the
    /// link body itself is interpreted.
    LinkDir,
}

/// Whether missing parent directories of a target may be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentDirs {
    /// Create missing parents before creating the link.
    #[default]
    Create,
    /// Leave the filesystem alone; a missing parent makes creation fail.
    Require,
}

/// A desired symlink: `target` should be a link to `source`.
///
/// Both paths are stored absolute and normalized.  Whether the declared
/// source was absolute is remembered separately because it alone decides
/// if the link body is written absolute or relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    target: PathBuf,
    source: PathBuf,
    declared_source: PathBuf,
    source_is_absolute: bool,
}

impl LinkSpec {
    /// Build a spec from a raw `(target, source)` pair, resolving relative
    /// paths against `working_dir`.
    #[must_use]
    pub fn new(target: impl AsRef<Path>, source: impl AsRef<Path>, working_dir: &Path) -> Self {
        Self::with_base(target, source, working_dir, SourceBase::WorkingDir)
    }

    /// Build a spec choosing where a relative source is resolved from.
    ///
    /// The target is always resolved against `working_dir`.
    #[must_use]
    pub fn with_base(
        target: impl AsRef<Path>,
        source: impl AsRef<Path>,
        working_dir: &Path,
        base: SourceBase,
    ) -> Self {
        let target = paths::to_absolute(target.as_ref(), working_dir);
        let declared_source = source.as_ref().to_path_buf();
        let source_is_absolute = declared_source.is_absolute();
        let source = match base {
            SourceBase::WorkingDir => paths::to_absolute(&declared_source, working_dir),
            SourceBase::LinkDir => {
                paths::to_absolute(&declared_source, &paths::parent_dir(&target))
            }
        };
        Self {
            target,
            source,
            declared_source,
            source_is_absolute,
        }
    }

    /// Absolute path where the link should exist.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Absolute path the link should point to.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Source exactly as declared.
    #[must_use]
    pub fn declared_source(&self) -> &Path {
        &self.declared_source
    }

    /// Whether the declared source was absolute.
    #[must_use]
    pub const fn source_is_absolute(&self) -> bool {
        self.source_is_absolute
    }

    /// The string to store inside the link: the absolute source for an
    /// absolute declaration, otherwise the source relative to the link's
    /// directory.
    #[must_use]
    pub fn link_body(&self) -> PathBuf {
        if self.source_is_absolute {
            self.source.clone()
        } else {
            paths::to_relative(&self.source, &paths::parent_dir(&self.target))
        }
    }

    /// Human-readable description of this link.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "{} -> {}",
            self.target.display(),
            self.declared_source.display()
        )
    }
}

/// Make one attempt to bring `spec.target()` in line with `spec`.
///
/// Only a free target is ever touched: the link (and, with
/// [`ParentDirs::Create`], its missing parents) is created.  An occupied
/// target is reported as a conflict and left exactly as found.  A failed
/// creation is reported as [`ReconcileOutcome::CreationFailed`] and is never
/// retried here.
#[must_use]
pub fn reconcile(spec: &LinkSpec, parents: ParentDirs) -> ReconcileOutcome {
    if !state::source_exists(spec.source()) {
        return ReconcileOutcome::SourceMissing;
    }

    let classification = match state::classify(spec.target(), spec.source()) {
        Ok(classification) => classification,
        Err(e) => {
            return ReconcileOutcome::CreationFailed {
                reason: format!("inspect {}: {e}", spec.target().display()),
            };
        }
    };

    match classification {
        LinkClassification::Absent => create(spec, parents),
        LinkClassification::LinkedToSource => ReconcileOutcome::AlreadySatisfied,
        LinkClassification::OccupiedNonLink => ReconcileOutcome::ConflictExists,
        LinkClassification::LinkedToOther => ReconcileOutcome::ConflictLinked,
    }
}

fn create(spec: &LinkSpec, parents: ParentDirs) -> ReconcileOutcome {
    let body = spec.link_body();
    let result = match parents {
        ParentDirs::Create => helpers::fs::ensure_parent_dir(spec.target()),
        ParentDirs::Require => Ok(()),
    }
    .and_then(|()| create_symlink(&body, spec.source(), spec.target()));

    match result {
        Ok(()) => {
            tracing::debug!(
                "created {} with body {}",
                spec.target().display(),
                body.display()
            );
            ReconcileOutcome::Created
        }
        Err(e) => ReconcileOutcome::CreationFailed {
            reason: format!("{e:#}"),
        },
    }
}

/// Create a symlink at `link` storing `body`.
///
/// `source` is the absolute location `body` refers to; only Windows looks at
/// it, to pick between a file and a directory link.
#[cfg(unix)]
fn create_symlink(body: &Path, _source: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(body, link)
        .with_context(|| format!("creating symlink {} -> {}", link.display(), body.display()))
}

#[cfg(windows)]
fn create_symlink(body: &Path, source: &Path, link: &Path) -> Result<()> {
    let result = if source.is_dir() {
        std::os::windows::fs::symlink_dir(body, link)
    } else {
        std::os::windows::fs::symlink_file(body, link)
    };
    result.with_context(|| format!("creating symlink {} -> {}", link.display(), body.display()))
}
