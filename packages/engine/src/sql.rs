use std::ops::ControlFlow;

use sqlparser::ast::{
    Insert, ObjectName, ObjectNamePart, Statement, TableFactor, TableObject, Update,
    Value as SqlValue, Visit, Visitor,
};
use sqlparser::dialect::{
    Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect,
};
use sqlparser::parser::Parser;

use crate::errors;
use crate::AuditError;

/// Grammar used to parse intercepted SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SqlDialect {
    #[default]
    Generic,
    MySql,
    Postgres,
    Sqlite,
    MsSql,
}

impl SqlDialect {
    pub fn parse(name: &str) -> Result<Self, AuditError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            "mssql" | "sqlserver" => Ok(Self::MsSql),
            other => Err(errors::invalid_configuration_error(
                "sqlDialect",
                format!(
                    "unknown dialect '{other}'; expected one of generic, mysql, postgres, sqlite, mssql"
                ),
            )),
        }
    }

    fn grammar(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {}),
            Self::MsSql => Box::new(MsSqlDialect {}),
        }
    }
}

/// Parses text that must hold exactly one statement.
pub fn parse_statement(sql: &str, dialect: SqlDialect) -> Result<Statement, AuditError> {
    let grammar = dialect.grammar();
    let mut statements = Parser::parse_sql(grammar.as_ref(), sql)
        .map_err(|error| errors::parse_failure_error(sql, &error.to_string()))?;
    if statements.len() != 1 {
        return Err(errors::parse_failure_error(
            sql,
            &format!("expected a single statement, found {}", statements.len()),
        ));
    }
    Ok(statements.remove(0))
}

/// Unqualified, unquoted name of an object (`db.public."Orders"` -> `Orders`).
pub(crate) fn object_base_name(name: &ObjectName) -> Option<&str> {
    name.0
        .last()
        .and_then(ObjectNamePart::as_ident)
        .map(|ident| ident.value.as_str())
}

pub(crate) fn insert_table_name(insert: &Insert) -> Option<&str> {
    match &insert.table {
        TableObject::TableName(name) => object_base_name(name),
        _ => None,
    }
}

/// Every table an `UPDATE` writes through: the target relation and each
/// joined relation, in statement order.
pub(crate) fn update_table_names(update: &Update) -> Vec<&str> {
    std::iter::once(&update.table.relation)
        .chain(update.table.joins.iter().map(|join| &join.relation))
        .filter_map(|relation| match relation {
            TableFactor::Table { name, .. } => object_base_name(name),
            _ => None,
        })
        .collect()
}

struct PlaceholderCounter {
    count: usize,
}

impl Visitor for PlaceholderCounter {
    type Break = ();

    fn pre_visit_value(&mut self, value: &SqlValue) -> ControlFlow<Self::Break> {
        if let SqlValue::Placeholder(_) = value {
            self.count += 1;
        }
        ControlFlow::Continue(())
    }
}

/// Number of bind placeholders (`?`, `?1`, `$1`, ...) in a statement.
pub fn count_placeholders(statement: &Statement) -> usize {
    let mut counter = PlaceholderCounter { count: 0 };
    let _ = statement.visit(&mut counter);
    counter.count
}
