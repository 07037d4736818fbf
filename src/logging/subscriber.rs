//! Tracing subscriber setup: console formatter, file layer, and initialisation.
//!
//! Both outputs classify an event the same way (see [`Kind`]) and differ
//! only in how they render it: the console uses colors, the log file uses
//! bracketed tags and a timestamp per line.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use super::location::log_file_path;
use super::types::EntryStatus;

/// Target of events emitted by [`Logger::stage`](super::Logger::stage).
pub(super) const STAGE_TARGET: &str = "symlinker::stage";
/// Target of events emitted by [`Logger::notice`](super::Logger::notice).
pub(super) const NOTICE_TARGET: &str = "symlinker::notice";
/// Target of the per-entry lines of the run summary.
pub(super) const SUMMARY_TARGET: &str = "symlinker::summary";

/// Environment variable holding `tracing` filter directives for the console.
const LOG_FILTER_ENV: &str = "SYMLINKER_LOG";

/// Fields of an event that the layers render.
#[derive(Debug, Default)]
struct Fields {
    message: String,
    status: Option<EntryStatus>,
}

impl Fields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

impl tracing::field::Visit for Fields {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = EntryStatus::from_label(value),
            _ => {}
        }
    }
}

/// How an event is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Notice,
    Summary(Option<EntryStatus>),
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn of(metadata: &tracing::Metadata<'_>, status: Option<EntryStatus>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (tracing::Level::ERROR, _) => Self::Error,
            (tracing::Level::WARN, _) => Self::Warn,
            (tracing::Level::INFO, STAGE_TARGET) => Self::Stage,
            (tracing::Level::INFO, NOTICE_TARGET) => Self::Notice,
            (tracing::Level::INFO, SUMMARY_TARGET) => Self::Summary(status),
            (tracing::Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text line for the log file.
    fn file_line(self, time: &str, msg: &str) -> String {
        let tag = match self {
            Self::Stage => return format!("[{time}] ==> {msg}"),
            Self::Notice => "[notice] ",
            Self::Error => "[error] ",
            Self::Warn => "[warn] ",
            Self::Debug => "[debug] ",
            Self::Summary(_) | Self::Info => "",
        };
        format!("[{time}]     {tag}{msg}")
    }

    /// Colored line for the terminal.
    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::Notice => format!("  \x1b[33m{msg}\x1b[0m"),
            Self::Info => format!("  {msg}"),
            Self::Summary(Some(status)) => format!("  {}{msg}\x1b[0m", status_color(status)),
            Self::Summary(None) | Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

const fn status_color(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Linked | EntryStatus::Replaced => "\x1b[32m",
        EntryStatus::AlreadyLinked => "\x1b[2m",
        EntryStatus::Pending => "\x1b[33m",
        EntryStatus::Conflict | EntryStatus::Failed => "\x1b[31m",
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to the
/// per-command log file.
///
/// The file is truncated when the layer is created, so it always holds the
/// most recent run of that command.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command` and write the run header.
    ///
    /// Returns `None` if the file cannot be created.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("SYMLINKER_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let mut file = fs::File::create(&path).ok()?;
        writeln!(
            file,
            "# symlinker {version} {command} {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let fields = Fields::of(event);
        let kind = Kind::of(event.metadata(), fields.status);
        let time = Utc::now().format("%H:%M:%S").to_string();
        let line = kind.file_line(&time, &fields.message);

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] for the compact console style.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let fields = Fields::of(event);
        let kind = Kind::of(event.metadata(), fields.status);
        writeln!(writer, "{}", kind.console_line(&fields.message))
    }
}

/// Console filter: directives from [`LOG_FILTER_ENV`] when set, otherwise
/// `debug` with `verbose` and `info` without.
fn console_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(LOG_FILTER_ENV)
        .from_env_lossy()
}

/// Initialise the global [`tracing`] subscriber.
///
/// Errors and warnings go to stderr and everything else to stdout.  The
/// log file at `$XDG_CACHE_HOME/symlinker/<command>.log` receives every
/// event down to `debug`, whatever the console shows.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter(verbose));

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
