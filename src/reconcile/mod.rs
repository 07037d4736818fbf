//! Batch reconciliation of an ordered list of `(target, source)` pairs.
//!
//! Each entry is reconciled once; a conflict is handed to [`resolve`], which
//! may clear the target and retry exactly once.  Entries are processed in
//! the order given and are isolated from each other: a failure is recorded
//! in that entry's [`EntryReport`] and the batch moves on.
pub mod conflict;

pub use conflict::{Policy, Resolution, resolve};

use std::path::Path;

use crate::resources::ReconcileOutcome;
use crate::resources::error::ResourceError;
use crate::resources::symlink::{self, LinkSpec, SourceBase};

/// Everything that happened to one mapping entry.
#[derive(Debug)]
pub struct EntryReport {
    /// The link that was reconciled.
    pub spec: LinkSpec,
    /// Outcome of the first reconciliation attempt.
    pub outcome: ReconcileOutcome,
    /// Present only when `outcome` was a conflict.
    pub resolution: Option<Result<Resolution, ResourceError>>,
}

impl EntryReport {
    /// The outcome that describes the target's state after this entry.
    ///
    /// That is the retry's outcome when a retry ran, otherwise the first
    /// outcome.
    #[must_use]
    pub fn final_outcome(&self) -> &ReconcileOutcome {
        match &self.resolution {
            Some(Ok(resolution)) => resolution.retry().unwrap_or(&self.outcome),
            _ => &self.outcome,
        }
    }

    /// Returns `true` if the target did not end up linked to the source.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match &self.resolution {
            Some(Err(_)) => true,
            _ => !self.final_outcome().is_success(),
        }
    }
}

/// Reconcile `spec` under `policy`, resolving a conflict if one is found.
#[must_use]
pub fn reconcile_entry(spec: LinkSpec, policy: &Policy) -> EntryReport {
    let outcome = symlink::reconcile(&spec, policy.parents);
    let resolution = outcome
        .is_conflict()
        .then(|| resolve(&spec, &outcome, policy));
    EntryReport {
        spec,
        outcome,
        resolution,
    }
}

/// Reconcile every `(target, source)` pair in order.
///
/// Relative targets are resolved against `working_dir`; relative sources
/// against `working_dir` or the link's own directory, depending on `base`.
/// The returned reports are in input order.
#[must_use]
pub fn reconcile_all<I, T, S>(
    entries: I,
    working_dir: &Path,
    policy: &Policy,
    base: SourceBase,
) -> Vec<EntryReport>
where
    I: IntoIterator<Item = (T, S)>,
    T: AsRef<Path>,
    S: AsRef<Path>,
{
    entries
        .into_iter()
        .map(|(target, source)| {
            let spec = LinkSpec::with_base(target, source, working_dir, base);
            let report = reconcile_entry(spec, policy);
            tracing::debug!(
                "{}: {:?}",
                report.spec.description(),
                report.final_outcome()
            );
            report
        })
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::resources::symlink::ParentDirs;

    fn force(backup: bool) -> Policy {
        Policy {
            force: true,
            backup,
            parents: ParentDirs::Create,
        }
    }

    #[test]
    fn second_run_is_already_satisfied() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "a").unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        let entries = [("link-a", "a"), ("nested/link-b", "b")];

        let first = reconcile_all(entries, dir.path(), &Policy::default(), SourceBase::default());
        let second = reconcile_all(entries, dir.path(), &Policy::default(), SourceBase::default());

        assert!(
            first
                .iter()
                .all(|r| r.outcome == ReconcileOutcome::Created)
        );
        assert!(
            second
                .iter()
                .all(|r| r.outcome == ReconcileOutcome::AlreadySatisfied)
        );
        assert!(first.iter().chain(&second).all(|r| !r.is_failure()));
    }

    #[test]
    fn reports_follow_input_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("s"), "s").unwrap();
        let entries = [("z", "s"), ("a", "missing"), ("m", "s")];

        let reports = reconcile_all(entries, dir.path(), &Policy::default(), SourceBase::default());

        let targets: Vec<_> = reports
            .iter()
            .map(|r| {
                r.spec
                    .target()
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(targets, ["z", "a", "m"]);
        assert_eq!(reports[1].outcome, ReconcileOutcome::SourceMissing);
        assert!(reports[1].is_failure());
        assert!(!reports[2].is_failure());
    }

    #[test]
    fn later_entry_can_use_directory_created_by_earlier_one() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shared")).unwrap();
        std::fs::write(dir.path().join("shared/file"), "f").unwrap();
        // The second link's source only exists through the first link.
        let entries = [("out/shared", "shared"), ("out/file", "out/shared/file")];

        let reports = reconcile_all(entries, dir.path(), &Policy::default(), SourceBase::default());

        assert_eq!(reports[0].outcome, ReconcileOutcome::Created);
        assert_eq!(reports[1].outcome, ReconcileOutcome::Created);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out/file")).unwrap(),
            "f"
        );
    }

    #[test]
    fn conflict_without_force_is_failure_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("s"), "s").unwrap();
        std::fs::write(dir.path().join("t"), "precious").unwrap();

        let reports = reconcile_all([("t", "s")], dir.path(), &Policy::default(), SourceBase::default());

        let report = &reports[0];
        assert_eq!(report.outcome, ReconcileOutcome::ConflictExists);
        assert!(matches!(report.resolution, Some(Ok(Resolution::Reported))));
        assert!(report.is_failure());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("t")).unwrap(),
            "precious"
        );
    }

    #[test]
    fn forced_conflict_reports_retry_outcome() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("s"), "s").unwrap();
        std::fs::write(dir.path().join("t"), "old").unwrap();

        let reports = reconcile_all([("t", "s")], dir.path(), &force(true), SourceBase::default());

        let report = &reports[0];
        assert_eq!(report.outcome, ReconcileOutcome::ConflictExists);
        assert_eq!(report.final_outcome(), &ReconcileOutcome::Created);
        assert!(!report.is_failure());
    }

    #[test]
    fn forced_removal_of_directory_links_target() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("s"), "s").unwrap();
        std::fs::create_dir_all(dir.path().join("t/deep/er")).unwrap();
        std::fs::write(dir.path().join("t/deep/er/x"), "x").unwrap();

        let reports = reconcile_all([("t", "s")], dir.path(), &force(false), SourceBase::default());

        assert_eq!(reports[0].final_outcome(), &ReconcileOutcome::Created);
        assert_eq!(std::fs::read_to_string(dir.path().join("t")).unwrap(), "s");
    }

    #[test]
    fn resolution_error_is_failure() {
        let spec = LinkSpec::new("t", "s", Path::new("/nowhere"));
        let report = EntryReport {
            spec,
            outcome: ReconcileOutcome::ConflictExists,
            resolution: Some(Err(ResourceError::BackupFailed {
                path: "/nowhere/t".into(),
                source: std::io::Error::other("read-only filesystem"),
            })),
        };
        assert!(report.is_failure());
        assert_eq!(report.final_outcome(), &ReconcileOutcome::ConflictExists);
    }

    #[test]
    fn failed_retry_is_failure() {
        let spec = LinkSpec::new("t", "s", Path::new("/nowhere"));
        let report = EntryReport {
            spec,
            outcome: ReconcileOutcome::ConflictLinked,
            resolution: Some(Ok(Resolution::Removed {
                retry: ReconcileOutcome::ConflictExists,
            })),
        };
        assert!(report.is_failure());
        assert_eq!(report.final_outcome(), &ReconcileOutcome::ConflictExists);
    }
}
