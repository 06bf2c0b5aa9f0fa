use serde::Deserialize;

use crate::ignore::{IgnoreTables, IGNORE_TABLES_KEY};
use crate::naming::camel_case;
use crate::sql::SqlDialect;
use crate::AuditError;

pub const DEFAULT_CREATE_COLUMN: &str = "gmt_create";
pub const DEFAULT_UPDATE_COLUMN: &str = "gmt_modified";

const CREATE_COLUMN_KEY: &str = "createDateColumnName";
const UPDATE_COLUMN_KEY: &str = "updateDateColumnName";
const SQL_DIALECT_KEY: &str = "sqlDialect";

/// Names of the two audit-timestamp columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditColumns {
    pub create: String,
    pub update: String,
}

impl AuditColumns {
    pub fn new(create: impl Into<String>, update: impl Into<String>) -> Self {
        Self {
            create: create.into(),
            update: update.into(),
        }
    }

    /// Property name a host binds for the creation column (`gmt_create` -> `gmtCreate`).
    pub fn create_property(&self) -> String {
        camel_case(&self.create)
    }

    pub fn update_property(&self) -> String {
        camel_case(&self.update)
    }
}

impl Default for AuditColumns {
    fn default() -> Self {
        Self::new(DEFAULT_CREATE_COLUMN, DEFAULT_UPDATE_COLUMN)
    }
}

/// Interceptor settings. Built once when the plugin is registered and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawAuditConfig")]
pub struct AuditConfig {
    pub columns: AuditColumns,
    pub ignore_tables: IgnoreTables,
    pub dialect: SqlDialect,
}

impl AuditConfig {
    /// Builds a configuration from a string-keyed property bag.
    ///
    /// Recognized keys are `createDateColumnName`, `updateDateColumnName`,
    /// `ignoreTables` and `sqlDialect`. Unknown keys are ignored; when a key
    /// repeats, the last value wins.
    pub fn from_properties<I, K, V>(properties: I) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = RawAuditConfig::default();
        for (key, value) in properties {
            let value = Some(value.as_ref().to_string());
            match key.as_ref() {
                CREATE_COLUMN_KEY => raw.create_date_column_name = value,
                UPDATE_COLUMN_KEY => raw.update_date_column_name = value,
                IGNORE_TABLES_KEY => raw.ignore_tables = value,
                SQL_DIALECT_KEY => raw.sql_dialect = value,
                _ => {}
            }
        }
        Self::try_from(raw)
    }

    pub fn with_columns(mut self, columns: AuditColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_ignore_tables(mut self, ignore_tables: IgnoreTables) -> Self {
        self.ignore_tables = ignore_tables;
        self
    }

    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn is_exempt(&self, table: &str) -> bool {
        self.ignore_tables.matches(table)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuditConfig {
    create_date_column_name: Option<String>,
    update_date_column_name: Option<String>,
    ignore_tables: Option<String>,
    sql_dialect: Option<String>,
}

impl TryFrom<RawAuditConfig> for AuditConfig {
    type Error = AuditError;

    fn try_from(raw: RawAuditConfig) -> Result<Self, Self::Error> {
        let columns = AuditColumns::new(
            column_or_default(raw.create_date_column_name, DEFAULT_CREATE_COLUMN),
            column_or_default(raw.update_date_column_name, DEFAULT_UPDATE_COLUMN),
        );
        let ignore_tables = match raw.ignore_tables {
            Some(raw) => IgnoreTables::parse(&raw)?,
            None => IgnoreTables::empty(),
        };
        let dialect = match raw.sql_dialect {
            Some(name) if !name.trim().is_empty() => SqlDialect::parse(&name)?,
            _ => SqlDialect::default(),
        };
        Ok(Self {
            columns,
            ignore_tables,
            dialect,
        })
    }
}

fn column_or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{AuditColumns, AuditConfig};
    use crate::errors::ErrorCode;
    use crate::sql::SqlDialect;

    #[test]
    fn defaults_apply_without_properties() {
        let config = AuditConfig::from_properties(Vec::<(&str, &str)>::new()).expect("config");
        assert_eq!(config.columns, AuditColumns::new("gmt_create", "gmt_modified"));
        assert!(config.ignore_tables.is_empty());
        assert_eq!(config.dialect, SqlDialect::Generic);
    }

    #[test]
    fn recognized_keys_override_defaults() {
        let config = AuditConfig::from_properties([
            ("createDateColumnName", "created_at"),
            ("updateDateColumnName", "updated_at"),
            ("ignoreTables", "^audit_.*,^tmp_.*"),
            ("sqlDialect", "mysql"),
        ])
        .expect("config");
        assert_eq!(config.columns.create, "created_at");
        assert_eq!(config.columns.update, "updated_at");
        assert_eq!(config.ignore_tables.len(), 2);
        assert!(config.is_exempt("audit_log"));
        assert!(!config.is_exempt("orders"));
        assert_eq!(config.dialect, SqlDialect::MySql);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = AuditConfig::from_properties([("somethingElse", "x"), ("dialect", "nope")])
            .expect("config");
        assert_eq!(config.columns, AuditColumns::default());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AuditConfig::from_properties([
            ("createDateColumnName", " "),
            ("ignoreTables", "   "),
            ("sqlDialect", ""),
        ])
        .expect("config");
        assert_eq!(config.columns.create, "gmt_create");
        assert!(config.ignore_tables.is_empty());
        assert_eq!(config.dialect, SqlDialect::Generic);
    }

    #[test]
    fn invalid_ignore_pattern_fails_registration() {
        let error = AuditConfig::from_properties([("ignoreTables", "[oops")])
            .expect_err("invalid regex should fail");
        assert!(error.has_code(ErrorCode::InvalidConfiguration));
    }

    #[test]
    fn camel_cased_properties_follow_column_names() {
        let columns = AuditColumns::new("create_time", "update_time");
        assert_eq!(columns.create_property(), "createTime");
        assert_eq!(columns.update_property(), "updateTime");
    }

    #[test]
    fn deserializes_from_camel_case_keys() {
        let config: AuditConfig = serde_json::from_value(serde_json::json!({
            "createDateColumnName": "created",
            "ignoreTables": "^audit_.*",
            "unrelated": true
        }))
        .expect("deserialize config");
        assert_eq!(config.columns.create, "created");
        assert_eq!(config.columns.update, "gmt_modified");
        assert!(config.is_exempt("audit_trail"));
    }

    #[test]
    fn deserialization_surfaces_configuration_errors() {
        let error = serde_json::from_value::<AuditConfig>(serde_json::json!({
            "sqlDialect": "cobol"
        }))
        .expect_err("unknown dialect should fail");
        assert!(error.to_string().contains("cobol"));
    }
}
