mod insert;
mod update;

use sqlparser::ast::Statement;

use crate::config::AuditConfig;
use crate::errors;
use crate::sql::{insert_table_name, update_table_names};
use crate::timestamp::TimestampLiteral;
use crate::AuditError;

pub use insert::{rewrite_insert, InsertForm};
pub use update::rewrite_update;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOutcome {
    Stamped,
    /// Every target table matched an ignore pattern; the statement is untouched.
    Exempt,
}

pub fn stamp_insert(
    statement: &mut Statement,
    config: &AuditConfig,
    literal: &TimestampLiteral,
) -> Result<StampOutcome, AuditError> {
    let Statement::Insert(insert) = statement else {
        return Err(kind_mismatch_error("INSERT", statement));
    };
    if let Some(table) = insert_table_name(insert) {
        if let Some(pattern) = config.ignore_tables.first_match(table) {
            log::debug!("INSERT into `{table}` matches ignore pattern `{pattern}`; left untouched");
            return Ok(StampOutcome::Exempt);
        }
    }
    rewrite_insert(insert, &config.columns, literal)?;
    Ok(StampOutcome::Stamped)
}

/// Multi-table updates are stamped once when any target is not exempt; a
/// second pass would only overwrite the slot the first one appended.
pub fn stamp_update(
    statement: &mut Statement,
    config: &AuditConfig,
    literal: &TimestampLiteral,
) -> Result<StampOutcome, AuditError> {
    let Statement::Update(update) = statement else {
        return Err(kind_mismatch_error("UPDATE", statement));
    };
    if !update_touches_audited_table(update_table_names(update), config) {
        return Ok(StampOutcome::Exempt);
    }
    rewrite_update(update, &config.columns, literal)?;
    Ok(StampOutcome::Stamped)
}

/// Whether the bindings of an already stamped statement need reconciling.
pub(crate) fn insert_is_audited(
    statement: &Statement,
    config: &AuditConfig,
) -> Result<bool, AuditError> {
    let Statement::Insert(insert) = statement else {
        return Err(kind_mismatch_error("INSERT", statement));
    };
    Ok(!insert_table_name(insert).is_some_and(|table| config.is_exempt(table)))
}

pub(crate) fn update_is_audited(
    statement: &Statement,
    config: &AuditConfig,
) -> Result<bool, AuditError> {
    let Statement::Update(update) = statement else {
        return Err(kind_mismatch_error("UPDATE", statement));
    };
    Ok(update_touches_audited_table(
        update_table_names(update),
        config,
    ))
}

fn update_touches_audited_table(tables: Vec<&str>, config: &AuditConfig) -> bool {
    tables.into_iter().any(|table| !config.is_exempt(table))
}

fn kind_mismatch_error(expected: &str, statement: &Statement) -> AuditError {
    errors::internal_invariant_error(format!(
        "host reported a {expected} statement but the SQL parsed as {}",
        statement_label(statement)
    ))
}

fn statement_label(statement: &Statement) -> &'static str {
    match statement {
        Statement::Insert(_) => "INSERT",
        Statement::Update(_) => "UPDATE",
        Statement::Delete(_) => "DELETE",
        Statement::Query(_) => "SELECT",
        _ => "another statement kind",
    }
}
