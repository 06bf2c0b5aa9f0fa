use sqlparser::ast::{Expr, Ident, Insert, Query, SetExpr};

use crate::config::AuditColumns;
use crate::errors;
use crate::sql::insert_table_name;
use crate::timestamp::TimestampLiteral;
use crate::AuditError;

/// Shape of the row source of an `INSERT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertForm {
    SingleRowValues,
    MultiRowValues,
    /// `INSERT ... SELECT`, and any other source that is not a `VALUES` list.
    Subselect,
}

impl InsertForm {
    pub fn of(insert: &Insert) -> Self {
        let Some(source) = &insert.source else {
            return Self::Subselect;
        };
        match source.body.as_ref() {
            SetExpr::Values(values) if values.rows.len() == 1 => Self::SingleRowValues,
            SetExpr::Values(_) => Self::MultiRowValues,
            _ => Self::Subselect,
        }
    }
}

/// Stamps both audit columns into an `INSERT`.
///
/// A column already in the list keeps its position and gets its value
/// overwritten in every row. A missing column is appended, creation column
/// first, with the literal appended to every row.
pub fn rewrite_insert(
    insert: &mut Insert,
    columns: &AuditColumns,
    literal: &TimestampLiteral,
) -> Result<(), AuditError> {
    let table = insert_table_name(insert).unwrap_or_default().to_string();
    if InsertForm::of(insert) == InsertForm::Subselect {
        return Err(errors::unsupported_insert_shape_error(&table));
    }
    if insert.columns.is_empty() {
        return Err(errors::internal_invariant_error(format!(
            "INSERT into `{table}` has no column list; audit columns cannot be positioned"
        )));
    }

    let create_index = find_column_index(&insert.columns, &columns.create);
    let update_index = find_column_index(&insert.columns, &columns.update);

    let column_count = insert.columns.len();
    let rows = values_rows_mut(&mut insert.source)
        .ok_or_else(|| errors::unsupported_insert_shape_error(&table))?;
    for (row_index, row) in rows.iter().enumerate() {
        if row.len() != column_count {
            return Err(errors::internal_invariant_error(format!(
                "INSERT into `{table}` row {row_index} has {} values for {column_count} columns",
                row.len()
            )));
        }
    }

    stamp_column(
        &mut insert.columns,
        rows,
        &columns.create,
        create_index,
        literal,
    );
    if columns.update != columns.create {
        stamp_column(
            &mut insert.columns,
            rows,
            &columns.update,
            update_index,
            literal,
        );
    }

    Ok(())
}

fn stamp_column(
    declared: &mut Vec<Ident>,
    rows: &mut [Vec<Expr>],
    column: &str,
    existing_index: Option<usize>,
    literal: &TimestampLiteral,
) {
    match existing_index {
        Some(index) => {
            for row in rows.iter_mut() {
                row[index] = literal.to_expr();
            }
        }
        None => {
            declared.push(Ident::new(column));
            for row in rows.iter_mut() {
                row.push(literal.to_expr());
            }
        }
    }
}

fn values_rows_mut(source: &mut Option<Box<Query>>) -> Option<&mut [Vec<Expr>]> {
    let source = source.as_mut()?;
    let SetExpr::Values(values) = source.body.as_mut() else {
        return None;
    };
    Some(values.rows.as_mut_slice())
}

/// Case-sensitive lookup on the identifier text. A duplicated column resolves
/// to its last occurrence.
fn find_column_index(columns: &[Ident], target: &str) -> Option<usize> {
    columns.iter().rposition(|column| column.value == target)
}

#[cfg(test)]
mod tests {
    use sqlparser::ast::{Insert, Statement};

    use super::{rewrite_insert, InsertForm};
    use crate::config::AuditColumns;
    use crate::errors::ErrorCode;
    use crate::sql::{parse_statement, SqlDialect};
    use crate::timestamp::TimestampLiteral;

    const TS: &str = "2024-05-06 07:08:09.010";

    fn parse_insert(sql: &str) -> Insert {
        match parse_statement(sql, SqlDialect::Generic).expect("parse insert") {
            Statement::Insert(insert) => insert,
            other => panic!("expected insert, got {other}"),
        }
    }

    fn rewrite(sql: &str) -> String {
        let mut insert = parse_insert(sql);
        rewrite_insert(
            &mut insert,
            &AuditColumns::default(),
            &TimestampLiteral::new(TS),
        )
        .expect("rewrite insert");
        Statement::Insert(insert).to_string()
    }

    #[test]
    fn classifies_insert_forms() {
        assert_eq!(
            InsertForm::of(&parse_insert("INSERT INTO t (a) VALUES (1)")),
            InsertForm::SingleRowValues
        );
        assert_eq!(
            InsertForm::of(&parse_insert("INSERT INTO t (a) VALUES (1), (2)")),
            InsertForm::MultiRowValues
        );
        assert_eq!(
            InsertForm::of(&parse_insert("INSERT INTO t (a) SELECT x FROM u")),
            InsertForm::Subselect
        );
    }

    #[test]
    fn appends_both_columns_when_absent() {
        assert_eq!(
            rewrite("INSERT INTO t (a) VALUES (1)"),
            format!("INSERT INTO t (a, gmt_create, gmt_modified) VALUES (1, '{TS}', '{TS}')")
        );
    }

    #[test]
    fn overwrites_present_column_in_place() {
        assert_eq!(
            rewrite("INSERT INTO t (a, gmt_create) VALUES (1, '2000-01-01 00:00:00.000')"),
            format!("INSERT INTO t (a, gmt_create, gmt_modified) VALUES (1, '{TS}', '{TS}')")
        );
    }

    #[test]
    fn overwrites_both_columns_and_keeps_order() {
        assert_eq!(
            rewrite("INSERT INTO t (gmt_modified, a, gmt_create) VALUES (?, 1, ?)"),
            format!("INSERT INTO t (gmt_modified, a, gmt_create) VALUES ('{TS}', 1, '{TS}')")
        );
    }

    #[test]
    fn stamps_every_row_of_multi_row_values() {
        assert_eq!(
            rewrite("INSERT INTO t (a) VALUES (1), (2)"),
            format!(
                "INSERT INTO t (a, gmt_create, gmt_modified) VALUES (1, '{TS}', '{TS}'), (2, '{TS}', '{TS}')"
            )
        );
    }

    #[test]
    fn column_match_is_case_sensitive() {
        assert_eq!(
            rewrite("INSERT INTO t (a, GMT_CREATE) VALUES (1, 2)"),
            format!(
                "INSERT INTO t (a, GMT_CREATE, gmt_create, gmt_modified) VALUES (1, 2, '{TS}', '{TS}')"
            )
        );
    }

    #[test]
    fn rejects_insert_select() {
        let mut insert = parse_insert("INSERT INTO t (a) SELECT x FROM u");
        let before = Statement::Insert(insert.clone()).to_string();
        let error = rewrite_insert(
            &mut insert,
            &AuditColumns::default(),
            &TimestampLiteral::new(TS),
        )
        .expect_err("subselect should be rejected");
        assert!(error.has_code(ErrorCode::UnsupportedInsertShape));
        assert_eq!(Statement::Insert(insert).to_string(), before);
    }

    #[test]
    fn rejects_rows_that_do_not_match_the_column_list() {
        let mut insert = parse_insert("INSERT INTO t (a, b) VALUES (1, 2), (3)");
        let error = rewrite_insert(
            &mut insert,
            &AuditColumns::default(),
            &TimestampLiteral::new(TS),
        )
        .expect_err("short row should be rejected");
        assert!(error.has_code(ErrorCode::InternalInvariant));
        assert!(error.description.contains("row 1"));
    }

    #[test]
    fn rejects_insert_without_column_list() {
        let mut insert = parse_insert("INSERT INTO t VALUES (1)");
        let error = rewrite_insert(
            &mut insert,
            &AuditColumns::default(),
            &TimestampLiteral::new(TS),
        )
        .expect_err("missing column list should be rejected");
        assert!(error.has_code(ErrorCode::InternalInvariant));
    }

    #[test]
    fn identical_column_names_are_stamped_once() {
        let mut insert = parse_insert("INSERT INTO t (a) VALUES (1)");
        rewrite_insert(
            &mut insert,
            &AuditColumns::new("stamped_at", "stamped_at"),
            &TimestampLiteral::new(TS),
        )
        .expect("rewrite insert");
        assert_eq!(
            Statement::Insert(insert).to_string(),
            format!("INSERT INTO t (a, stamped_at) VALUES (1, '{TS}')")
        );
    }
}
