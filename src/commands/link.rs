//! `link` and `link-one`: bring declared symlinks into place.
use anyhow::{Context as _, Result};
use std::path::Path;

use crate::cli::{LinkOneOpts, LinkOpts, PolicyOpts};
use crate::config::Mapping;
use crate::logging::Logger;
use crate::reconcile;

/// Run the `link` command: reconcile every entry of the mapping file.
///
/// # Errors
///
/// Returns an error if the mapping file cannot be loaded or any entry fails.
pub fn run(opts: &LinkOpts, log: &Logger) -> Result<()> {
    log.stage("Loading mapping");
    let mapping = Mapping::load(&opts.file)?;
    log.info(&format!(
        "{} entries from {}",
        mapping.entries.len(),
        mapping.path.display()
    ));
    log.debug(&format!(
        "working directory: {}",
        mapping.working_dir.display()
    ));

    link_pairs(mapping.pairs(), &mapping.working_dir, &opts.policy, log)
}

/// Run the `link-one` command: reconcile a single `target -> source` pair.
///
/// # Errors
///
/// Returns an error if the base directory cannot be resolved or the entry
/// fails.
pub fn run_one(opts: &LinkOneOpts, log: &Logger) -> Result<()> {
    let dir = match &opts.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("reading current directory")?,
    };
    let working_dir = dunce::canonicalize(&dir)
        .with_context(|| format!("resolving directory {}", dir.display()))?;
    log.debug(&format!("working directory: {}", working_dir.display()));

    link_pairs(
        [(&opts.target, &opts.source)],
        &working_dir,
        &opts.policy,
        log,
    )
}

fn link_pairs<I, T, S>(
    pairs: I,
    working_dir: &Path,
    opts: &PolicyOpts,
    log: &Logger,
) -> Result<()>
where
    I: IntoIterator<Item = (T, S)>,
    T: AsRef<Path>,
    S: AsRef<Path>,
{
    let policy = opts.policy();
    log.stage("Linking");
    if policy.force {
        log.debug(if policy.backup {
            "conflicting targets will be backed up"
        } else {
            "conflicting targets will be removed"
        });
    }

    let reports = reconcile::reconcile_all(pairs, working_dir, &policy, opts.source_base.into());
    for report in &reports {
        super::report_entry(log, report);
    }

    super::finish(log)
}
