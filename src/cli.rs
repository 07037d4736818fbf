//! Command-line surface.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_MAPPING_FILE;
use crate::reconcile::Policy;
use crate::resources::symlink::{ParentDirs, SourceBase};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "symlinker",
    about = "Ensure symlinks declared in a mapping file",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (`SYMLINKER_LOG` filter directives take precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ensure every symlink declared in the mapping file
    Link(LinkOpts),
    /// Ensure a single symlink
    LinkOne(LinkOneOpts),
    /// Report the state of every declared symlink without changing anything
    Check(CheckOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Link(_) => "link",
            Self::LinkOne(_) => "link-one",
            Self::Check(_) => "check",
            Self::Version => "version",
        }
    }
}

/// How a relative source is resolved.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceBaseArg {
    /// Relative to the mapping file's directory (or `--dir`)
    #[default]
    WorkingDir,
    /// Relative to the directory containing the link
    LinkDir,
}

impl From<SourceBaseArg> for SourceBase {
    fn from(arg: SourceBaseArg) -> Self {
        match arg {
            SourceBaseArg::WorkingDir => Self::WorkingDir,
            SourceBaseArg::LinkDir => Self::LinkDir,
        }
    }
}

/// Conflict-handling flags shared by `link` and `link-one`.
#[derive(Parser, Debug, Clone)]
pub struct PolicyOpts {
    /// Replace targets that are occupied by something else
    #[arg(long)]
    pub force: bool,

    /// Delete a conflicting target instead of renaming it to a backup
    #[arg(long = "no-backup", action = clap::ArgAction::SetFalse)]
    pub backup: bool,

    /// Fail instead of creating missing parent directories of a target
    #[arg(long = "no-create-dirs", action = clap::ArgAction::SetFalse)]
    pub create_dirs: bool,

    /// Directory a relative source is resolved against
    #[arg(long, value_enum, default_value_t = SourceBaseArg::WorkingDir)]
    pub source_base: SourceBaseArg,
}

impl PolicyOpts {
    /// The reconciliation policy these flags select.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        Policy {
            force: self.force,
            backup: self.backup,
            parents: if self.create_dirs {
                ParentDirs::Create
            } else {
                ParentDirs::Require
            },
        }
    }
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LinkOpts {
    /// Location of the mapping file
    #[arg(long, short, default_value = DEFAULT_MAPPING_FILE)]
    pub file: PathBuf,

    #[command(flatten)]
    pub policy: PolicyOpts,
}

/// Options for the `link-one` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LinkOneOpts {
    /// Path where the symlink should exist
    pub target: PathBuf,

    /// Path the symlink should point to
    pub source: PathBuf,

    /// Directory relative paths are resolved against (default: current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyOpts,
}

/// Options for the `check` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CheckOpts {
    /// Location of the mapping file
    #[arg(long, short, default_value = DEFAULT_MAPPING_FILE)]
    pub file: PathBuf,

    /// Directory a relative source is resolved against
    #[arg(long, value_enum, default_value_t = SourceBaseArg::WorkingDir)]
    pub source_base: SourceBaseArg,
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
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_link_defaults() {
        let cli = Cli::parse_from(["symlinker", "link"]);
        let Command::Link(opts) = cli.command else {
            panic!("expected link command");
        };
        assert_eq!(opts.file, PathBuf::from("symlinker.yml"));
        assert_eq!(opts.policy.policy(), Policy::default());
        assert_eq!(opts.policy.source_base, SourceBaseArg::WorkingDir);
    }

    #[test]
    fn parse_link_with_flags() {
        let cli = Cli::parse_from([
            "symlinker",
            "link",
            "--file",
            "conf/links.toml",
            "--force",
            "--no-backup",
            "--no-create-dirs",
            "--source-base",
            "link-dir",
        ]);
        let Command::Link(opts) = cli.command else {
            panic!("expected link command");
        };
        assert_eq!(opts.file, PathBuf::from("conf/links.toml"));
        assert_eq!(
            opts.policy.policy(),
            Policy {
                force: true,
                backup: false,
                parents: ParentDirs::Require,
            }
        );
        assert_eq!(
            SourceBase::from(opts.policy.source_base),
            SourceBase::LinkDir
        );
    }

    #[test]
    fn parse_link_one() {
        let cli = Cli::parse_from([
            "symlinker",
            "link-one",
            "vendor/lib",
            "../shared/lib",
            "--dir",
            "/proj",
            "--force",
        ]);
        let Command::LinkOne(opts) = cli.command else {
            panic!("expected link-one command");
        };
        assert_eq!(opts.target, PathBuf::from("vendor/lib"));
        assert_eq!(opts.source, PathBuf::from("../shared/lib"));
        assert_eq!(opts.dir, Some(PathBuf::from("/proj")));
        assert!(opts.policy.force);
        assert!(opts.policy.backup);
    }

    #[test]
    fn link_one_requires_both_paths() {
        assert!(Cli::try_parse_from(["symlinker", "link-one", "only-target"]).is_err());
    }

    #[test]
    fn parse_check_short_file() {
        let cli = Cli::parse_from(["symlinker", "check", "-f", "other.yml"]);
        let Command::Check(opts) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(opts.file, PathBuf::from("other.yml"));
    }

    #[test]
    fn check_rejects_force() {
        assert!(Cli::try_parse_from(["symlinker", "check", "--force"]).is_err());
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["symlinker", "version"]);
        assert!(matches!(cli.command, Command::Version));
        assert_eq!(cli.command.log_name(), "version");
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["symlinker", "link", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.command.log_name(), "link");
    }
}
