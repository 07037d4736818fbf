use anyhow::Result;
use clap::Parser;

use symlinker_cli::cli::{Cli, Command};
use symlinker_cli::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose, args.command.log_name());
    let log = logging::Logger::new(args.command.log_name());

    match &args.command {
        Command::Link(opts) => commands::link::run(opts, &log),
        Command::LinkOne(opts) => commands::link::run_one(opts, &log),
        Command::Check(opts) => commands::check::run(opts, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
