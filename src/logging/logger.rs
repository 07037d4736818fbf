//! Structured logger with summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::location::log_file_path;
use super::subscriber::{NOTICE_TARGET, STAGE_TARGET, SUMMARY_TARGET};
use super::types::{EntryRecord, EntryStatus};

/// Structured logger with summary collection.
///
/// Every message is a [`tracing`] event; [`init_subscriber`](super::init_subscriber)
/// decides where it is shown.  All messages are always written to a
/// persistent log file at `$XDG_CACHE_HOME/symlinker/<command>.log`
/// (default `~/.cache/symlinker/<command>.log`) with timestamps,
/// regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<EntryRecord>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The log file
    /// itself is created by [`init_subscriber`](super::init_subscriber); this
    /// constructor does not write to it.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<EntryRecord> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log something that changed the filesystem beyond creating a link,
    /// such as moving a target to a backup.
    pub fn notice(&self, msg: &str) {
        tracing::info!(target: NOTICE_TARGET, "{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record an entry result for the summary.
    pub fn record_entry(&self, name: &str, status: EntryStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(EntryRecord {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count recorded entries with the given status.
    #[must_use]
    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.lock().map_or(0, |guard| {
            guard.iter().filter(|e| e.status == status).count()
        })
    }

    /// Count entries whose status is a failure.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.lock().map_or(0, |guard| {
            guard.iter().filter(|e| e.status.is_failure()).count()
        })
    }

    /// Return `true` if any recorded entry has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// One-line tally of the recorded entries, without colors.
    ///
    /// Statuses with no entries are left out.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let total = self.entries.lock().map_or(0, |g| g.len());
        let parts: Vec<String> = EntryStatus::ALL
            .into_iter()
            .filter_map(|status| {
                let n = self.count(status);
                (n > 0).then(|| format!("{n} {}", status.label()))
            })
            .collect();
        let noun = if total == 1 { "entry" } else { "entries" };
        if parts.is_empty() {
            format!("{total} {noun}")
        } else {
            format!("{total} {noun}: {}", parts.join(", "))
        }
    }

    /// Print the summary of all recorded entries.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");

        for entry in &entries {
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            tracing::info!(
                target: SUMMARY_TARGET,
                status = entry.status.label(),
                "{} {}{suffix}",
                entry.status.icon(),
                entry.name
            );
        }

        self.info(&self.summary_line());

        if let Some(path) = &self.log_file {
            tracing::info!(target: SUMMARY_TARGET, "log: {}", path.display());
        }
    }
}
