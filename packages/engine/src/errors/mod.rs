use crate::AuditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseFailure,
    UnsupportedInsertShape,
    InternalInvariant,
    InvalidConfiguration,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseFailure => "AUDIT_STAMP_PARSE_FAILURE",
            Self::UnsupportedInsertShape => "AUDIT_STAMP_UNSUPPORTED_INSERT_SHAPE",
            Self::InternalInvariant => "AUDIT_STAMP_INTERNAL_INVARIANT",
            Self::InvalidConfiguration => "AUDIT_STAMP_INVALID_CONFIGURATION",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::ParseFailure,
            Self::UnsupportedInsertShape,
            Self::InternalInvariant,
            Self::InvalidConfiguration,
        ]
    }
}

impl AuditError {
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.code == code.as_str()
    }
}

fn build_error(code: ErrorCode, title: &str, description: &str) -> AuditError {
    AuditError::new(code.as_str(), title, description)
}

pub(crate) fn parse_failure_error(sql: &str, reason: &str) -> AuditError {
    build_error(
        ErrorCode::ParseFailure,
        "SQL could not be parsed",
        &format!("{reason} (sql: {sql})"),
    )
}

pub(crate) fn unsupported_insert_shape_error(table: &str) -> AuditError {
    build_error(
        ErrorCode::UnsupportedInsertShape,
        "Unsupported INSERT shape",
        &format!(
            "INSERT into `{table}` must use a VALUES list; INSERT ... SELECT and DEFAULT VALUES are not supported"
        ),
    )
}

pub(crate) fn internal_invariant_error(description: impl AsRef<str>) -> AuditError {
    build_error(
        ErrorCode::InternalInvariant,
        "Internal invariant violated",
        description.as_ref(),
    )
}

pub(crate) fn missing_host_property_error(path: &str) -> AuditError {
    internal_invariant_error(format!(
        "host handler has no readable property `{path}` of the expected type"
    ))
}

pub(crate) fn invalid_configuration_error(key: &str, description: impl AsRef<str>) -> AuditError {
    build_error(
        ErrorCode::InvalidConfiguration,
        "Invalid configuration",
        &format!("`{key}`: {}", description.as_ref()),
    )
}
