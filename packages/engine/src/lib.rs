mod bindings;
mod config;
mod error;
pub mod errors;
mod host;
mod ignore;
mod interceptor;
mod naming;
pub mod rewrite;
mod sql;
mod timestamp;

pub use bindings::{reconcile_bindings, BoundSql, ParameterMapping};
pub use config::{AuditColumns, AuditConfig, DEFAULT_CREATE_COLUMN, DEFAULT_UPDATE_COLUMN};
pub use error::AuditError;
pub use host::{
    HandlerState, HostValue, Invocation, MappedStatement, MemoryInvocation, MemoryStatementHandler,
    MemoryTarget, MetaObject, MetaParameterHandler, MetaStatementHandler, ParameterHandler,
    StatementHandler, StatementKind, PREPARE_METHOD, SET_PARAMETERS_METHOD,
};
pub use ignore::IgnoreTables;
pub use interceptor::{AuditInterceptor, PreparedSql, Signature};
pub use naming::camel_case;
pub use sql::{count_placeholders, parse_statement, SqlDialect};
pub use timestamp::{Clock, FixedClock, SystemClock, TimestampLiteral};
