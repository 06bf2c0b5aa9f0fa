use crate::app::AppContext;
use crate::cli::rewrite::{KindArg, RewriteArgs, RewriteOutputFormat};
use crate::engine;
use crate::error::CliError;
use crate::output::{self, RewriteReport};
use audit_stamp_engine::{
    AuditInterceptor, BoundSql, MappedStatement, MemoryInvocation, MemoryTarget,
    ParameterMapping, StatementKind,
};
use std::io::Read;

const CLI_STATEMENT_ID: &str = "audit-stamp.cli";

pub fn run(context: &AppContext, args: RewriteArgs) -> Result<(), CliError> {
    let sql = resolve_sql(&args)?;
    let bindings = parse_bindings(&args.bindings)?;
    let interceptor = engine::build_interceptor(context, args.timestamp.as_deref())?;
    let report = stamp(&interceptor, statement_kind(args.kind), sql, bindings)?;

    match args.format {
        RewriteOutputFormat::Json => output::print_report_json(&report),
        RewriteOutputFormat::Table => output::print_report_table(&report),
    }

    Ok(())
}

/// Drives one statement through both intercepted phases, as a host would
/// before executing it.
fn stamp(
    interceptor: &AuditInterceptor,
    kind: StatementKind,
    sql: String,
    bindings: Vec<ParameterMapping>,
) -> Result<RewriteReport, CliError> {
    let mapped = MappedStatement::new(CLI_STATEMENT_ID, kind);
    let bound_before = bindings.len();

    let prepared = interceptor.intercept(MemoryInvocation::prepare(
        MemoryTarget::statement(mapped.clone(), BoundSql::new(sql.clone(), bindings)),
        |target| Ok(target.into_bound_sql()),
    ))?;
    let bound = interceptor.intercept(MemoryInvocation::set_parameters(
        MemoryTarget::parameter(mapped, prepared),
        |target| Ok(target.into_bound_sql()),
    ))?;

    Ok(RewriteReport {
        changed: bound.sql != sql,
        removed_bindings: bound_before - bound.parameter_mappings.len(),
        original_sql: sql,
        bound,
    })
}

fn statement_kind(kind: KindArg) -> StatementKind {
    match kind {
        KindArg::Insert => StatementKind::Insert,
        KindArg::Update => StatementKind::Update,
        KindArg::Other => StatementKind::Other,
    }
}

fn parse_bindings(raw: &[String]) -> Result<Vec<ParameterMapping>, CliError> {
    raw.iter()
        .map(|entry| {
            let (property, jdbc_type) = match entry.split_once(':') {
                Some((property, jdbc_type)) => (property.trim(), Some(jdbc_type.trim())),
                None => (entry.trim(), None),
            };
            if property.is_empty() {
                return Err(CliError::InvalidArgs("--bind property must not be empty"));
            }
            let mapping = ParameterMapping::new(property);
            Ok(match jdbc_type {
                Some(jdbc_type) if !jdbc_type.is_empty() => mapping.with_jdbc_type(jdbc_type),
                _ => mapping,
            })
        })
        .collect()
}

fn resolve_sql(args: &RewriteArgs) -> Result<String, CliError> {
    if args.sql == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|source| CliError::io("failed to read SQL from stdin", source))?;
        if input.trim().is_empty() {
            return Err(CliError::InvalidArgs("stdin SQL input is empty"));
        }
        return Ok(input.trim().to_string());
    }

    Ok(args.sql.clone())
}
