//! Idempotent symlink primitives: inspect, create, back up, remove.
pub mod error;
pub mod helpers;
pub mod paths;
pub mod state;
pub mod symlink;

/// What currently occupies a target path, relative to the desired source.
///
/// Always computed from the live filesystem and never cached: callers must
/// classify again after any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClassification {
    /// Nothing exists at the target path, not even a dangling symlink.
    Absent,
    /// A regular file, directory or other non-link entry occupies the target.
    OccupiedNonLink,
    /// The target is a symlink whose body resolves to the desired source.
    LinkedToSource,
    /// The target is a symlink pointing anywhere else.
    LinkedToOther,
}

/// Result of one reconciliation attempt for a single target.
///
/// # Examples
///
/// ```
/// use symlinker_cli::resources::ReconcileOutcome;
///
/// assert!(ReconcileOutcome::Created.is_success());
/// assert!(ReconcileOutcome::ConflictLinked.is_conflict());
/// assert!(!ReconcileOutcome::SourceMissing.is_success());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The symlink was created.
    Created,
    /// The target already links to the source; nothing was touched.
    AlreadySatisfied,
    /// A non-link entry occupies the target.
    ConflictExists,
    /// The target is a symlink to some other location.
    ConflictLinked,
    /// The declared source does not exist; nothing was touched.
    SourceMissing,
    /// The target was free but the link could not be created.
    CreationFailed {
        /// Human-readable cause, including the underlying I/O error.
        reason: String,
    },
}

impl ReconcileOutcome {
    /// Returns `true` for the two outcomes that leave the target correctly linked.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Created | Self::AlreadySatisfied)
    }

    /// Returns `true` if the target is occupied by something other than the
    /// desired link.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::ConflictExists | Self::ConflictLinked)
    }
}
