use clap::Parser;
use std::process::ExitCode;
use todo_cli::cli::Cli;
use todo_cli::commands::{self, Error};
use todo_cli::config::Config;
use todo_cli::logging;
use todo_core::{FileSlot, TodoStore};
use tracing::debug;

fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();

    let config = Config::load(args.config.as_deref())?;
    logging::init(config.level()?);
    debug!(?config, "Loaded configuration");

    let mut store = TodoStore::initialize(FileSlot::new(&config.storage_path));
    let mut stdout = std::io::stdout().lock();

    match commands::execute(args.command.unwrap_or_default(), &mut store, &mut stdout) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(Error::Validation(err)) => {
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}
