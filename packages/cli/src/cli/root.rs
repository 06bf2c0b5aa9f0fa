use super::rewrite::RewriteArgs;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "audit-stamp")]
#[command(about = "Stamp audit timestamp columns into INSERT and UPDATE statements")]
pub struct Cli {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Log the original and stamped SQL to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Interceptor settings, named after the plugin properties they set.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Creation timestamp column (`createDateColumnName`).
    #[arg(long, global = true, default_value = "gmt_create")]
    pub create_column: String,

    /// Modification timestamp column (`updateDateColumnName`).
    #[arg(long, global = true, default_value = "gmt_modified")]
    pub update_column: String,

    /// Comma-separated regular expressions of exempt tables (`ignoreTables`).
    #[arg(long, global = true, default_value = "")]
    pub ignore_tables: String,

    /// SQL dialect used to parse statements (`sqlDialect`).
    #[arg(long, global = true, default_value = "generic")]
    pub dialect: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the prepare and bind phases over one statement and print the result.
    Rewrite(RewriteArgs),
}
