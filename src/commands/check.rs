//! `check`: report the state of every declared link without touching it.
use anyhow::Result;

use crate::cli::CheckOpts;
use crate::config::Mapping;
use crate::logging::{EntryStatus, Logger};
use crate::resources::LinkClassification;
use crate::resources::state;
use crate::resources::symlink::LinkSpec;

/// Run the `check` command.
///
/// # Errors
///
/// Returns an error if the mapping file cannot be loaded or any entry is
/// not already linked to its source.
pub fn run(opts: &CheckOpts, log: &Logger) -> Result<()> {
    let mapping = Mapping::load(&opts.file)?;
    log.stage(&format!("Checking {}", mapping.path.display()));

    for (target, source) in mapping.pairs() {
        let spec = LinkSpec::with_base(
            target,
            source,
            &mapping.working_dir,
            opts.source_base.into(),
        );
        let (status, message) = inspect(&spec);
        let line = format!(
            "{}: {}",
            spec.description(),
            message.as_deref().unwrap_or(status.label())
        );
        match status {
            EntryStatus::AlreadyLinked => log.info(&line),
            EntryStatus::Pending => log.warn(&line),
            _ => log.error(&line),
        }
        log.record_entry(&spec.description(), status, message.as_deref());
    }

    log.print_summary();

    let unlinked = log.entries().len() - log.count(EntryStatus::AlreadyLinked);
    if unlinked > 0 {
        anyhow::bail!("{unlinked} entry(s) not linked");
    }
    Ok(())
}

/// Classify `spec` without mutating anything.
fn inspect(spec: &LinkSpec) -> (EntryStatus, Option<String>) {
    if !state::source_exists(spec.source()) {
        return (EntryStatus::Failed, Some("source missing".to_string()));
    }

    match state::classify(spec.target(), spec.source()) {
        Ok(LinkClassification::LinkedToSource) => (EntryStatus::AlreadyLinked, None),
        Ok(LinkClassification::Absent) => (EntryStatus::Pending, Some("not linked yet".to_string())),
        Ok(LinkClassification::OccupiedNonLink) => {
            (EntryStatus::Conflict, Some("target exists".to_string()))
        }
        Ok(LinkClassification::LinkedToOther) => (
            EntryStatus::Conflict,
            Some("linked to another location".to_string()),
        ),
        Err(e) => (EntryStatus::Failed, Some(format!("cannot inspect: {e}"))),
    }
}
