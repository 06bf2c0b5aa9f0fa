use super::AppContext;
use crate::cli::root::{Cli, Command};
use crate::commands;
use crate::error::CliError;
use clap::Parser;

pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let context = AppContext {
        create_column: cli.settings.create_column,
        update_column: cli.settings.update_column,
        ignore_tables: cli.settings.ignore_tables,
        dialect: cli.settings.dialect,
    };

    match cli.command {
        Command::Rewrite(args) => commands::rewrite::run(&context, args),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}
