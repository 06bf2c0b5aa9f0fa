use clap::{Args, ValueEnum};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum KindArg {
    Insert,
    Update,
    Other,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum RewriteOutputFormat {
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Statement kind as the mapper declares it.
    #[arg(long, value_enum, default_value_t = KindArg::Insert)]
    pub kind: KindArg,

    /// Bound parameter property, in placeholder order. Repeatable; use
    /// `property:JDBC_TYPE` to attach a type hint.
    #[arg(long = "bind", value_name = "PROPERTY")]
    pub bindings: Vec<String>,

    /// Pin the injected timestamp instead of reading the clock.
    #[arg(long, value_name = "yyyy-MM-dd HH:mm:ss.SSS")]
    pub timestamp: Option<String>,

    /// Output format for the stamped statement.
    #[arg(long, value_enum, default_value_t = RewriteOutputFormat::Table)]
    pub format: RewriteOutputFormat,

    /// SQL statement text. Use '-' to read from stdin.
    pub sql: String,
}
