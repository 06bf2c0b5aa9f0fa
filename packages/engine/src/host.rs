//! Seams between the interceptor and the persistence framework hosting it.
//!
//! The interceptor only talks to [`StatementHandler`], [`ParameterHandler`]
//! and [`Invocation`]. Hosts that expose their handlers as reflective
//! property bags plug in through [`MetaObject`] and the `Meta*` adapters,
//! which keep the property paths in one place.

use serde::{Deserialize, Serialize};

use crate::bindings::BoundSql;
use crate::errors;
use crate::AuditError;

const PREPARE_MAPPED_STATEMENT_PATH: &str = "delegate.mappedStatement";
const PREPARE_SQL_PATH: &str = "delegate.boundSql.sql";
const BIND_MAPPED_STATEMENT_PATH: &str = "mappedStatement";
const BIND_BOUND_SQL_PATH: &str = "boundSql";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    Insert,
    Update,
    Other,
}

impl StatementKind {
    /// Maps a host command name (`INSERT`, `select`, `FLUSH`, ...) to a kind.
    pub fn from_command(command: &str) -> Self {
        if command.eq_ignore_ascii_case("insert") {
            Self::Insert
        } else if command.eq_ignore_ascii_case("update") {
            Self::Update
        } else {
            Self::Other
        }
    }
}

/// Prepare-phase view of a statement handler: SQL text is still mutable.
pub trait StatementHandler {
    fn kind(&self) -> Result<StatementKind, AuditError>;
    fn sql(&self) -> Result<String, AuditError>;
    fn set_sql(&mut self, sql: String) -> Result<(), AuditError>;
}

/// Bind-phase view of a parameter handler: the descriptor list is still mutable.
pub trait ParameterHandler {
    fn kind(&self) -> Result<StatementKind, AuditError>;
    fn bound_sql_mut(&mut self) -> Result<&mut BoundSql, AuditError>;
}

/// One intercepted host call.
///
/// `proceed` consumes the invocation, so the continuation runs at most once.
pub trait Invocation {
    type Output;
    type Error: From<AuditError>;

    fn method_name(&self) -> &str;

    /// The statement handler behind any proxy layers, if the target is one.
    fn statement_handler(&mut self) -> Option<&mut dyn StatementHandler>;

    fn parameter_handler(&mut self) -> Option<&mut dyn ParameterHandler>;

    fn proceed(self) -> Result<Self::Output, Self::Error>;
}

/// Host metadata for a mapped statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedStatement {
    pub id: String,
    pub command: StatementKind,
}

impl MappedStatement {
    pub fn new(id: impl Into<String>, command: StatementKind) -> Self {
        Self {
            id: id.into(),
            command,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum HostValue<'a> {
    Text(&'a str),
    MappedStatement(&'a MappedStatement),
    BoundSql(&'a BoundSql),
}

/// Reflective, path-addressed access to a host object.
pub trait MetaObject {
    fn value(&self, path: &str) -> Option<HostValue<'_>>;
    fn set_text(&mut self, path: &str, value: String) -> bool;
    fn bound_sql_mut(&mut self, path: &str) -> Option<&mut BoundSql>;
}

/// Adapts a reflective statement handler (`delegate.mappedStatement`,
/// `delegate.boundSql.sql`) to [`StatementHandler`].
#[derive(Debug, Clone)]
pub struct MetaStatementHandler<M> {
    inner: M,
}

impl<M: MetaObject> MetaStatementHandler<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: MetaObject> StatementHandler for MetaStatementHandler<M> {
    fn kind(&self) -> Result<StatementKind, AuditError> {
        match self.inner.value(PREPARE_MAPPED_STATEMENT_PATH) {
            Some(HostValue::MappedStatement(mapped)) => Ok(mapped.command),
            _ => Err(errors::missing_host_property_error(
                PREPARE_MAPPED_STATEMENT_PATH,
            )),
        }
    }

    fn sql(&self) -> Result<String, AuditError> {
        match self.inner.value(PREPARE_SQL_PATH) {
            Some(HostValue::Text(sql)) => Ok(sql.to_string()),
            _ => Err(errors::missing_host_property_error(PREPARE_SQL_PATH)),
        }
    }

    fn set_sql(&mut self, sql: String) -> Result<(), AuditError> {
        if self.inner.set_text(PREPARE_SQL_PATH, sql) {
            Ok(())
        } else {
            Err(errors::missing_host_property_error(PREPARE_SQL_PATH))
        }
    }
}

/// Adapts a reflective parameter handler (`mappedStatement`, `boundSql`) to
/// [`ParameterHandler`].
#[derive(Debug, Clone)]
pub struct MetaParameterHandler<M> {
    inner: M,
}

impl<M: MetaObject> MetaParameterHandler<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: MetaObject> ParameterHandler for MetaParameterHandler<M> {
    fn kind(&self) -> Result<StatementKind, AuditError> {
        match self.inner.value(BIND_MAPPED_STATEMENT_PATH) {
            Some(HostValue::MappedStatement(mapped)) => Ok(mapped.command),
            _ => Err(errors::missing_host_property_error(
                BIND_MAPPED_STATEMENT_PATH,
            )),
        }
    }

    fn bound_sql_mut(&mut self) -> Result<&mut BoundSql, AuditError> {
        self.inner
            .bound_sql_mut(BIND_BOUND_SQL_PATH)
            .ok_or_else(|| errors::missing_host_property_error(BIND_BOUND_SQL_PATH))
    }
}

/// Mapped statement plus bound SQL, addressable by the host's property names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerState {
    pub mapped_statement: MappedStatement,
    pub bound_sql: BoundSql,
}

impl HandlerState {
    pub fn new(mapped_statement: MappedStatement, bound_sql: BoundSql) -> Self {
        Self {
            mapped_statement,
            bound_sql,
        }
    }
}

impl MetaObject for HandlerState {
    fn value(&self, path: &str) -> Option<HostValue<'_>> {
        match path {
            "mappedStatement" => Some(HostValue::MappedStatement(&self.mapped_statement)),
            "boundSql" => Some(HostValue::BoundSql(&self.bound_sql)),
            "boundSql.sql" => Some(HostValue::Text(&self.bound_sql.sql)),
            _ => None,
        }
    }

    fn set_text(&mut self, path: &str, value: String) -> bool {
        if path != "boundSql.sql" {
            return false;
        }
        self.bound_sql.sql = value;
        true
    }

    fn bound_sql_mut(&mut self, path: &str) -> Option<&mut BoundSql> {
        (path == "boundSql").then_some(&mut self.bound_sql)
    }
}

/// In-memory routing statement handler: the real handler sits under `delegate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStatementHandler {
    pub delegate: HandlerState,
}

impl MetaObject for MemoryStatementHandler {
    fn value(&self, path: &str) -> Option<HostValue<'_>> {
        self.delegate.value(path.strip_prefix("delegate.")?)
    }

    fn set_text(&mut self, path: &str, value: String) -> bool {
        match path.strip_prefix("delegate.") {
            Some(path) => self.delegate.set_text(path, value),
            None => false,
        }
    }

    fn bound_sql_mut(&mut self, path: &str) -> Option<&mut BoundSql> {
        self.delegate.bound_sql_mut(path.strip_prefix("delegate.")?)
    }
}

pub const PREPARE_METHOD: &str = "prepare";
pub const SET_PARAMETERS_METHOD: &str = "setParameters";

#[derive(Debug, Clone)]
pub enum MemoryTarget {
    Statement(MetaStatementHandler<MemoryStatementHandler>),
    Parameter(MetaParameterHandler<HandlerState>),
}

impl MemoryTarget {
    pub fn statement(mapped_statement: MappedStatement, bound_sql: BoundSql) -> Self {
        Self::Statement(MetaStatementHandler::new(MemoryStatementHandler {
            delegate: HandlerState::new(mapped_statement, bound_sql),
        }))
    }

    pub fn parameter(mapped_statement: MappedStatement, bound_sql: BoundSql) -> Self {
        Self::Parameter(MetaParameterHandler::new(HandlerState::new(
            mapped_statement,
            bound_sql,
        )))
    }

    pub fn bound_sql(&self) -> &BoundSql {
        match self {
            Self::Statement(handler) => &handler.inner().delegate.bound_sql,
            Self::Parameter(handler) => &handler.inner().bound_sql,
        }
    }

    pub fn into_bound_sql(self) -> BoundSql {
        match self {
            Self::Statement(handler) => handler.into_inner().delegate.bound_sql,
            Self::Parameter(handler) => handler.into_inner().bound_sql,
        }
    }
}

/// Invocation over an in-memory handler. The continuation receives the
/// target after interception, so callers can inspect what reached it.
pub struct MemoryInvocation<F> {
    method: String,
    target: MemoryTarget,
    continuation: F,
}

impl<F, O> MemoryInvocation<F>
where
    F: FnOnce(MemoryTarget) -> Result<O, AuditError>,
{
    pub fn new(method: impl Into<String>, target: MemoryTarget, continuation: F) -> Self {
        Self {
            method: method.into(),
            target,
            continuation,
        }
    }

    pub fn prepare(target: MemoryTarget, continuation: F) -> Self {
        Self::new(PREPARE_METHOD, target, continuation)
    }

    pub fn set_parameters(target: MemoryTarget, continuation: F) -> Self {
        Self::new(SET_PARAMETERS_METHOD, target, continuation)
    }
}

impl<F, O> Invocation for MemoryInvocation<F>
where
    F: FnOnce(MemoryTarget) -> Result<O, AuditError>,
{
    type Output = O;
    type Error = AuditError;

    fn method_name(&self) -> &str {
        &self.method
    }

    fn statement_handler(&mut self) -> Option<&mut dyn StatementHandler> {
        match &mut self.target {
            MemoryTarget::Statement(handler) => Some(handler),
            MemoryTarget::Parameter(_) => None,
        }
    }

    fn parameter_handler(&mut self) -> Option<&mut dyn ParameterHandler> {
        match &mut self.target {
            MemoryTarget::Parameter(handler) => Some(handler),
            MemoryTarget::Statement(_) => None,
        }
    }

    fn proceed(self) -> Result<O, AuditError> {
        (self.continuation)(self.target)
    }
}
