use crate::app::AppContext;
use crate::error::CliError;
use audit_stamp_engine::{AuditConfig, AuditInterceptor, FixedClock, TimestampLiteral};

pub fn build_config(context: &AppContext) -> Result<AuditConfig, CliError> {
    AuditConfig::from_properties([
        ("createDateColumnName", context.create_column.as_str()),
        ("updateDateColumnName", context.update_column.as_str()),
        ("ignoreTables", context.ignore_tables.as_str()),
        ("sqlDialect", context.dialect.as_str()),
    ])
    .map_err(|source| CliError::audit("invalid interceptor settings", source))
}

pub fn build_interceptor(
    context: &AppContext,
    timestamp: Option<&str>,
) -> Result<AuditInterceptor, CliError> {
    let config = build_config(context)?;
    log::debug!("interceptor settings: {config:?}");
    Ok(match timestamp {
        Some(text) => {
            AuditInterceptor::with_clock(config, FixedClock::new(TimestampLiteral::new(text)))
        }
        None => AuditInterceptor::new(config),
    })
}
