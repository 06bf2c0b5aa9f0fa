use regex::Regex;

use crate::errors;
use crate::AuditError;

pub(crate) const IGNORE_TABLES_KEY: &str = "ignoreTables";

/// Ordered list of table-name patterns exempt from audit stamping.
#[derive(Debug, Clone, Default)]
pub struct IgnoreTables {
    patterns: Vec<IgnorePattern>,
}

#[derive(Debug, Clone)]
struct IgnorePattern {
    source: String,
    compiled: Regex,
}

impl IgnoreTables {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a comma-separated pattern list. Whitespace around a pattern is
    /// not significant: entries are trimmed and blank entries are skipped, so
    /// `""` and `"  "` both yield an empty list.
    pub fn parse(raw: &str) -> Result<Self, AuditError> {
        Self::from_patterns(raw.split(','))
    }

    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let source = pattern.as_ref().trim();
            if source.is_empty() {
                continue;
            }
            compiled.push(IgnorePattern::compile(source)?);
        }
        Ok(Self { patterns: compiled })
    }

    /// True iff some pattern matches the whole table name. Patterns are tried
    /// in configured order and the first hit wins.
    pub fn matches(&self, table: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.compiled.is_match(table))
    }

    pub fn first_match(&self, table: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| pattern.compiled.is_match(table))
            .map(|pattern| pattern.source.as_str())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|pattern| pattern.source.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

impl IgnorePattern {
    fn compile(source: &str) -> Result<Self, AuditError> {
        // Anchored on both ends: a pattern must describe the entire name.
        let compiled = Regex::new(&format!("^(?:{source})$")).map_err(|error| {
            errors::invalid_configuration_error(
                IGNORE_TABLES_KEY,
                format!("pattern '{source}' is not a valid regular expression: {error}"),
            )
        })?;
        Ok(Self {
            source: source.to_string(),
            compiled,
        })
    }
}
