use serde::{Deserialize, Serialize};

use crate::config::AuditColumns;

/// One positional parameter descriptor of a prepared statement, as the host
/// tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMapping {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jdbc_type: Option<String>,
}

impl ParameterMapping {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            jdbc_type: None,
        }
    }

    pub fn with_jdbc_type(mut self, jdbc_type: impl Into<String>) -> Self {
        self.jdbc_type = Some(jdbc_type.into());
        self
    }
}

/// SQL text paired with the parameter descriptors bound to its placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundSql {
    pub sql: String,
    pub parameter_mappings: Vec<ParameterMapping>,
}

impl BoundSql {
    pub fn new(sql: impl Into<String>, parameter_mappings: Vec<ParameterMapping>) -> Self {
        Self {
            sql: sql.into(),
            parameter_mappings,
        }
    }
}

/// Drops descriptors that bind an audit column. Once stamped, those columns
/// hold inline literals, so their descriptors would shift every later bind.
///
/// Returns the number of descriptors removed.
pub fn reconcile_bindings(mappings: &mut Vec<ParameterMapping>, columns: &AuditColumns) -> usize {
    let create_property = columns.create_property();
    let update_property = columns.update_property();
    let before = mappings.len();

    mappings.retain(|mapping| {
        let column = if mapping.property == create_property {
            &columns.create
        } else if mapping.property == update_property {
            &columns.update
        } else {
            return true;
        };
        log::warn!(
            "statement already binds auto-stamped column `{column}` (property `{}`); dropping the binding",
            mapping.property
        );
        false
    });

    before - mappings.len()
}
