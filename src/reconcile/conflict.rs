//! Conflict resolution: back up or remove an occupied target, then retry once.
use std::path::PathBuf;

use crate::resources::error::ResourceError;
use crate::resources::helpers::fs;
use crate::resources::symlink::{self, LinkSpec, ParentDirs};
use crate::resources::ReconcileOutcome;

/// How conflicts are handled and whether missing parents are created.
///
/// # Examples
///
/// ```
/// use symlinker_cli::reconcile::Policy;
///
/// let policy = Policy::default();
/// assert!(!policy.force);
/// assert!(policy.backup);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Clear conflicting targets instead of only reporting them.
    pub force: bool,
    /// When forcing, rename the old target to a backup instead of deleting it.
    pub backup: bool,
    /// Whether missing parent directories of a target are created.
    pub parents: ParentDirs,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            force: false,
            backup: true,
            parents: ParentDirs::Create,
        }
    }
}

/// What the resolver did about a conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing was touched; the conflict stands.
    Reported,
    /// The old target was renamed to `backup`, then reconciliation ran once more.
    BackedUp {
        /// Where the previous target now lives.
        backup: PathBuf,
        /// Outcome of the single retry.
        retry: ReconcileOutcome,
    },
    /// The old target was deleted, then reconciliation ran once more.
    Removed {
        /// Outcome of the single retry.
        retry: ReconcileOutcome,
    },
}

impl Resolution {
    /// Outcome of the retry, if one ran.
    #[must_use]
    pub const fn retry(&self) -> Option<&ReconcileOutcome> {
        match self {
            Self::Reported => None,
            Self::BackedUp { retry, .. } | Self::Removed { retry } => Some(retry),
        }
    }
}

/// Apply `policy` to a conflicting `outcome` for `spec`.
///
/// Without `force`, or for an outcome that is not a conflict, nothing is
/// touched.  With `force`, the target is backed up (or removed) and
/// [`symlink::reconcile`] runs exactly once more; whatever it returns,
/// including another conflict, is final.
///
/// # Errors
///
/// Returns [`ResourceError`] if the backup or removal fails; no retry is
/// attempted in that case.  A source that is the target or lies inside it
/// fails with [`ResourceError::SourceInsideTarget`] before anything is
/// touched.
pub fn resolve(
    spec: &LinkSpec,
    outcome: &ReconcileOutcome,
    policy: &Policy,
) -> Result<Resolution, ResourceError> {
    if !policy.force || !outcome.is_conflict() {
        return Ok(Resolution::Reported);
    }

    if spec.source().starts_with(spec.target()) {
        return Err(ResourceError::SourceInsideTarget {
            path: spec.target().to_path_buf(),
            source_path: spec.source().to_path_buf(),
        });
    }

    if policy.backup {
        let backup = fs::backup(spec.target())?;
        let retry = symlink::reconcile(spec, policy.parents);
        Ok(Resolution::BackedUp { backup, retry })
    } else {
        fs::remove_recursive(spec.target())?;
        let retry = symlink::reconcile(spec, policy.parents);
        Ok(Resolution::Removed { retry })
    }
}
