use std::fmt::{Display, Formatter};

use audit_stamp_engine::AuditError;

#[derive(Debug)]
pub enum CliError {
    InvalidArgs(&'static str),
    Audit {
        context: &'static str,
        source: AuditError,
    },
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

impl CliError {
    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub fn audit(context: &'static str, source: AuditError) -> Self {
        Self::Audit { context, source }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgs(message) => write!(f, "invalid arguments: {message}"),
            Self::Audit { context, source } => write!(f, "{context}: {source} [{}]", source.code),
            Self::Io { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<AuditError> for CliError {
    fn from(source: AuditError) -> Self {
        Self::audit("audit stamping failed", source)
    }
}
