//! Subcommand orchestration: load input, reconcile, report.
pub mod check;
pub mod link;
pub mod version;

use anyhow::Result;

use crate::logging::{EntryStatus, Logger};
use crate::reconcile::{EntryReport, Resolution};
use crate::resources::ReconcileOutcome;
use crate::resources::symlink::LinkSpec;

/// Log what happened to one entry and record it for the summary.
///
/// A forced conflict produces two lines: a notice for the backup or
/// removal, then the line for the retry's own outcome.
pub fn report_entry(log: &Logger, report: &EntryReport) {
    let spec = &report.spec;
    let target = spec.target().display();

    let (status, message) = match &report.resolution {
        None | Some(Ok(Resolution::Reported)) => log_outcome(log, spec, &report.outcome),
        Some(Ok(Resolution::BackedUp { backup, retry })) => {
            log.notice(&format!("moved {target} to {}", backup.display()));
            let (status, message) = log_outcome(log, spec, retry);
            replaced(status, message, format!("backup: {}", backup.display()))
        }
        Some(Ok(Resolution::Removed { retry })) => {
            log.notice(&format!("removed {target}"));
            let (status, message) = log_outcome(log, spec, retry);
            replaced(status, message, "previous target removed".to_string())
        }
        Some(Err(e)) => {
            log.error(&format!("could not clear {target}: {e}"));
            (EntryStatus::Failed, Some(e.to_string()))
        }
    };

    log.record_entry(&spec.description(), status, message.as_deref());
}

/// Print the summary and fail if any recorded entry failed.
///
/// # Errors
///
/// Returns an error if one or more entries recorded a failure.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    if log.has_failures() {
        anyhow::bail!("{} entry(s) failed", log.failure_count());
    }
    Ok(())
}

/// Log the line for a single reconcile outcome and return its summary status.
fn log_outcome(
    log: &Logger,
    spec: &LinkSpec,
    outcome: &ReconcileOutcome,
) -> (EntryStatus, Option<String>) {
    let target = spec.target().display();
    let source = spec.declared_source().display();

    match outcome {
        ReconcileOutcome::Created => {
            log.info(&format!("linked {target} -> {source}"));
            (EntryStatus::Linked, None)
        }
        ReconcileOutcome::AlreadySatisfied => {
            log.info(&format!("already linked {target} -> {source}"));
            (EntryStatus::AlreadyLinked, None)
        }
        ReconcileOutcome::ConflictExists => {
            log.error(&format!(
                "{target} already exists (use --force to replace it)"
            ));
            (EntryStatus::Conflict, Some("target exists".to_string()))
        }
        ReconcileOutcome::ConflictLinked => {
            let current = std::fs::read_link(spec.target())
                .map_or_else(|_| "another location".to_string(), |p| p.display().to_string());
            log.error(&format!(
                "{target} is already linked to {current} (use --force to replace it)"
            ));
            (EntryStatus::Conflict, Some(format!("linked to {current}")))
        }
        ReconcileOutcome::SourceMissing => {
            log.error(&format!(
                "source {} for {target} does not exist",
                spec.source().display()
            ));
            (EntryStatus::Failed, Some("source missing".to_string()))
        }
        ReconcileOutcome::CreationFailed { reason } => {
            log.error(&format!("could not link {target}: {reason}"));
            (EntryStatus::Failed, Some(reason.clone()))
        }
    }
}

/// A successful retry after clearing the target counts as a replacement.
fn replaced(
    status: EntryStatus,
    message: Option<String>,
    detail: String,
) -> (EntryStatus, Option<String>) {
    if status == EntryStatus::Linked {
        (EntryStatus::Replaced, Some(detail))
    } else {
        (status, message)
    }
}
