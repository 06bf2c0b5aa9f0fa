use sqlparser::ast::Statement;

use crate::bindings::{reconcile_bindings, BoundSql};
use crate::config::AuditConfig;
use crate::errors;
use crate::host::{
    Invocation, ParameterHandler, StatementHandler, StatementKind, PREPARE_METHOD,
    SET_PARAMETERS_METHOD,
};
use crate::rewrite::{self, StampOutcome};
use crate::sql::{count_placeholders, parse_statement};
use crate::timestamp::{Clock, SystemClock, TimestampLiteral};
use crate::AuditError;

/// A host method the interceptor registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub target: &'static str,
    pub method: &'static str,
    pub args: &'static [&'static str],
}

const SIGNATURES: [Signature; 2] = [
    Signature {
        target: "StatementHandler",
        method: PREPARE_METHOD,
        args: &["Connection", "Integer"],
    },
    Signature {
        target: "ParameterHandler",
        method: SET_PARAMETERS_METHOD,
        args: &["PreparedStatement"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Prepare,
    Bind,
    PassThrough,
}

impl Phase {
    fn of(method_name: &str) -> Self {
        match method_name {
            PREPARE_METHOD => Self::Prepare,
            SET_PARAMETERS_METHOD => Self::Bind,
            _ => Self::PassThrough,
        }
    }
}

/// Result of the prepare-phase rewrite of one SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedSql {
    Rewritten(String),
    Unchanged,
}

impl PreparedSql {
    pub fn into_sql(self, original: &str) -> String {
        match self {
            Self::Rewritten(sql) => sql,
            Self::Unchanged => original.to_string(),
        }
    }
}

/// Stamps audit timestamps into `INSERT`/`UPDATE` statements and keeps the
/// host's parameter descriptors aligned with the stamped SQL.
pub struct AuditInterceptor {
    config: AuditConfig,
    clock: Box<dyn Clock>,
}

impl AuditInterceptor {
    pub fn new(config: AuditConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: AuditConfig, clock: impl Clock + 'static) -> Self {
        Self {
            config,
            clock: Box::new(clock),
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn signatures() -> &'static [Signature] {
        &SIGNATURES
    }

    /// Runs the phase named by the invocation, then its continuation.
    ///
    /// The continuation is skipped only when the rewrite itself fails; its
    /// own errors are returned untouched.
    pub fn intercept<I: Invocation>(&self, mut invocation: I) -> Result<I::Output, I::Error> {
        match Phase::of(invocation.method_name()) {
            Phase::Prepare => {
                let literal = self.clock.timestamp();
                let handler = invocation.statement_handler().ok_or_else(|| {
                    errors::internal_invariant_error(
                        "prepare invocation target is not a statement handler",
                    )
                })?;
                self.prepare_handler(handler, &literal)?;
            }
            Phase::Bind => {
                let handler = invocation.parameter_handler().ok_or_else(|| {
                    errors::internal_invariant_error(
                        "setParameters invocation target is not a parameter handler",
                    )
                })?;
                self.bind_handler(handler)?;
            }
            Phase::PassThrough => {}
        }
        invocation.proceed()
    }

    fn prepare_handler(
        &self,
        handler: &mut dyn StatementHandler,
        literal: &TimestampLiteral,
    ) -> Result<(), AuditError> {
        let kind = handler.kind()?;
        if kind == StatementKind::Other {
            return Ok(());
        }
        let sql = handler.sql()?;
        if let PreparedSql::Rewritten(rewritten) = self.prepare_sql_at(kind, &sql, literal)? {
            handler.set_sql(rewritten)?;
        }
        Ok(())
    }

    fn bind_handler(&self, handler: &mut dyn ParameterHandler) -> Result<(), AuditError> {
        let kind = handler.kind()?;
        self.reconcile(kind, handler.bound_sql_mut()?)?;
        Ok(())
    }

    /// Prepare-phase rewrite stamped with the clock's current time.
    pub fn prepare_sql(&self, kind: StatementKind, sql: &str) -> Result<PreparedSql, AuditError> {
        self.prepare_sql_at(kind, sql, &self.clock.timestamp())
    }

    pub fn prepare_sql_at(
        &self,
        kind: StatementKind,
        sql: &str,
        literal: &TimestampLiteral,
    ) -> Result<PreparedSql, AuditError> {
        let mut statement = match kind {
            StatementKind::Other => return Ok(PreparedSql::Unchanged),
            StatementKind::Insert | StatementKind::Update => {
                parse_statement(sql, self.config.dialect)?
            }
        };
        log::debug!("intercepted {kind:?} sql: {sql}");

        let outcome = match kind {
            StatementKind::Insert => rewrite::stamp_insert(&mut statement, &self.config, literal)?,
            StatementKind::Update => rewrite::stamp_update(&mut statement, &self.config, literal)?,
            StatementKind::Other => StampOutcome::Exempt,
        };
        if outcome == StampOutcome::Exempt {
            return Ok(PreparedSql::Unchanged);
        }

        let rewritten = statement.to_string();
        log::debug!("stamped {kind:?} sql: {rewritten}");
        Ok(PreparedSql::Rewritten(rewritten))
    }

    /// Bind-phase reconciliation of already stamped SQL. Returns the number of
    /// descriptors removed.
    pub fn reconcile(
        &self,
        kind: StatementKind,
        bound_sql: &mut BoundSql,
    ) -> Result<usize, AuditError> {
        if kind == StatementKind::Other {
            return Ok(0);
        }
        let statement = parse_statement(&bound_sql.sql, self.config.dialect)?;
        if !self.is_audited(kind, &statement)? {
            return Ok(0);
        }

        let removed = reconcile_bindings(&mut bound_sql.parameter_mappings, &self.config.columns);
        let placeholders = count_placeholders(&statement);
        if placeholders != bound_sql.parameter_mappings.len() {
            log::debug!(
                "{} parameter mappings remain for {placeholders} placeholders in: {}",
                bound_sql.parameter_mappings.len(),
                bound_sql.sql
            );
        }
        Ok(removed)
    }

    fn is_audited(&self, kind: StatementKind, statement: &Statement) -> Result<bool, AuditError> {
        match kind {
            StatementKind::Insert => rewrite::insert_is_audited(statement, &self.config),
            StatementKind::Update => rewrite::update_is_audited(statement, &self.config),
            StatementKind::Other => Ok(false),
        }
    }
}

impl std::fmt::Debug for AuditInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditInterceptor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
