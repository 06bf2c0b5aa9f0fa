use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use sqlparser::ast::{Expr, Value as SqlValue};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A wall-clock instant rendered as `yyyy-MM-dd HH:mm:ss.SSS`.
///
/// One literal is taken per rewrite and placed in every audit slot of that
/// statement, so all injected columns carry byte-identical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampLiteral {
    text: String,
}

impl TimestampLiteral {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_naive(&instant.naive_local())
    }

    pub fn from_naive(instant: &NaiveDateTime) -> Self {
        Self {
            text: instant.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Single-quoted string expression; the SQL serializer prints it as `'<text>'`.
    pub fn to_expr(&self) -> Expr {
        Expr::Value(SqlValue::SingleQuotedString(self.text.clone()).into())
    }
}

impl fmt::Display for TimestampLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}

pub trait Clock: Send + Sync {
    fn timestamp(&self) -> TimestampLiteral;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> TimestampLiteral {
        TimestampLiteral::now()
    }
}

/// Always reports the same literal. Used to pin rewrites in tests and dry runs.
#[derive(Debug, Clone)]
pub struct FixedClock {
    literal: TimestampLiteral,
}

impl FixedClock {
    pub fn new(literal: TimestampLiteral) -> Self {
        Self { literal }
    }
}

impl Clock for FixedClock {
    fn timestamp(&self) -> TimestampLiteral {
        self.literal.clone()
    }
}
