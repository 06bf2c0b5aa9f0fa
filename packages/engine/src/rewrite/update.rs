use sqlparser::ast::{
    Assignment, AssignmentTarget, Expr, Ident, ObjectName, ObjectNamePart, Update,
};

use crate::config::AuditColumns;
use crate::errors;
use crate::sql::object_base_name;
use crate::timestamp::TimestampLiteral;
use crate::AuditError;

/// Where the modification column is already assigned in a set-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssignedSlot {
    Column(usize),
    /// `SET (a, col) = (...)`: assignment index and position inside the tuple.
    TupleElement(usize, usize),
}

/// Stamps the modification column into an `UPDATE` set-list: an existing
/// assignment gets its value replaced, otherwise `<column> = '<ts>'` is
/// appended. The creation column is never touched.
///
/// A tuple assignment naming the column must carry a value tuple of the same
/// arity; anything else (a row subquery, say) cannot be stamped in place.
pub fn rewrite_update(
    update: &mut Update,
    columns: &AuditColumns,
    literal: &TimestampLiteral,
) -> Result<(), AuditError> {
    match find_assigned_slot(&update.assignments, &columns.update) {
        Some(AssignedSlot::Column(index)) => update.assignments[index].value = literal.to_expr(),
        Some(AssignedSlot::TupleElement(index, element)) => {
            let Assignment { target, value } = &mut update.assignments[index];
            let arity = match target {
                AssignmentTarget::Tuple(names) => names.len(),
                AssignmentTarget::ColumnName(_) => 1,
            };
            match value {
                Expr::Tuple(values) if values.len() == arity => {
                    values[element] = literal.to_expr();
                }
                other => {
                    return Err(errors::internal_invariant_error(format!(
                        "`{}` is assigned through a {arity}-column tuple whose value `{other}` is not a matching tuple",
                        columns.update
                    )));
                }
            }
        }
        None => update.assignments.push(Assignment {
            target: AssignmentTarget::ColumnName(ObjectName(vec![ObjectNamePart::Identifier(
                Ident::new(columns.update.as_str()),
            )])),
            value: literal.to_expr(),
        }),
    }
    Ok(())
}

fn find_assigned_slot(assignments: &[Assignment], column: &str) -> Option<AssignedSlot> {
    assignments
        .iter()
        .enumerate()
        .rev()
        .find_map(|(index, assignment)| match &assignment.target {
            AssignmentTarget::ColumnName(name) => {
                (object_base_name(name) == Some(column)).then_some(AssignedSlot::Column(index))
            }
            AssignmentTarget::Tuple(names) => names
                .iter()
                .rposition(|name| object_base_name(name) == Some(column))
                .map(|element| AssignedSlot::TupleElement(index, element)),
        })
}
