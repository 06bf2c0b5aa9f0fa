use audit_stamp_engine::errors::ErrorCode;
use audit_stamp_engine::{
    AuditConfig, AuditInterceptor, FixedClock, PreparedSql, StatementKind, TimestampLiteral,
};

const TS: &str = "2024-05-06 07:08:09.010";
const LATER_TS: &str = "2024-05-06 07:08:10.500";

fn interceptor_at(config: AuditConfig, ts: &str) -> AuditInterceptor {
    AuditInterceptor::with_clock(config, FixedClock::new(TimestampLiteral::new(ts)))
}

fn stamp(kind: StatementKind, sql: &str) -> String {
    stamp_with(AuditConfig::default(), TS, kind, sql)
}

fn stamp_with(config: AuditConfig, ts: &str, kind: StatementKind, sql: &str) -> String {
    interceptor_at(config, ts)
        .prepare_sql(kind, sql)
        .expect("prepare sql")
        .into_sql(sql)
}

#[test]
fn s1_insert_gets_both_columns_appended() {
    assert_eq!(
        stamp(StatementKind::Insert, "INSERT INTO t (a) VALUES (1)"),
        format!("INSERT INTO t (a, gmt_create, gmt_modified) VALUES (1, '{TS}', '{TS}')")
    );
}

#[test]
fn s2_present_create_column_is_overwritten_and_modified_appended() {
    assert_eq!(
        stamp(
            StatementKind::Insert,
            "INSERT INTO t (a, gmt_create) VALUES (1, '2000-01-01 00:00:00.000')"
        ),
        format!("INSERT INTO t (a, gmt_create, gmt_modified) VALUES (1, '{TS}', '{TS}')")
    );
}

#[test]
fn s3_multi_row_values_are_stamped_per_row() {
    assert_eq!(
        stamp(StatementKind::Insert, "INSERT INTO t (a) VALUES (1),(2)"),
        format!(
            "INSERT INTO t (a, gmt_create, gmt_modified) VALUES (1, '{TS}', '{TS}'), (2, '{TS}', '{TS}')"
        )
    );
}

#[test]
fn s4_insert_select_is_unsupported() {
    let error = interceptor_at(AuditConfig::default(), TS)
        .prepare_sql(StatementKind::Insert, "INSERT INTO t (a) SELECT x FROM u")
        .expect_err("INSERT ... SELECT should be rejected");
    assert!(error.has_code(ErrorCode::UnsupportedInsertShape));
}

#[test]
fn s5_ignored_table_passes_through_unchanged() {
    let config = AuditConfig::from_properties([("ignoreTables", "^audit_.*")]).expect("config");
    let prepared = interceptor_at(config, TS)
        .prepare_sql(StatementKind::Insert, "INSERT INTO audit_log (a) VALUES (1)")
        .expect("prepare sql");
    assert_eq!(prepared, PreparedSql::Unchanged);
}

#[test]
fn s6_update_is_stamped_and_rerun_adds_nothing() {
    let once = stamp(StatementKind::Update, "UPDATE t SET a=1");
    assert_eq!(once, format!("UPDATE t SET a = 1, gmt_modified = '{TS}'"));

    let twice = stamp_with(AuditConfig::default(), LATER_TS, StatementKind::Update, &once);
    assert_eq!(twice, format!("UPDATE t SET a = 1, gmt_modified = '{LATER_TS}'"));
}

#[test]
fn stamped_insert_mentions_each_audit_column_once_with_one_value() {
    for sql in [
        "INSERT INTO t (a) VALUES (1)",
        "INSERT INTO t (gmt_modified, a) VALUES (?, ?)",
        "INSERT INTO t (gmt_create, gmt_modified) VALUES (NOW(), NOW())",
        "INSERT INTO t (a, b) VALUES (1, 2), (3, 4), (5, 6)",
    ] {
        let stamped = stamp(StatementKind::Insert, sql);
        assert_eq!(stamped.matches("gmt_create").count(), 1, "{stamped}");
        assert_eq!(stamped.matches("gmt_modified").count(), 1, "{stamped}");
        assert!(!stamped.contains("NOW()"), "{stamped}");
    }
}

#[test]
fn stamped_update_never_introduces_creation_column() {
    for sql in [
        "UPDATE t SET a = 1",
        "UPDATE t SET a = 1, gmt_modified = ? WHERE id = ?",
        "UPDATE t SET gmt_modified = gmt_modified",
    ] {
        let stamped = stamp(StatementKind::Update, sql);
        assert_eq!(stamped.matches("gmt_modified =").count(), 1, "{stamped}");
        assert!(!stamped.contains("gmt_create"), "{stamped}");
    }
}

#[test]
fn tuple_assignment_of_modified_column_is_stamped_in_place() {
    let stamped = stamp(
        StatementKind::Update,
        "UPDATE t SET (a, gmt_modified) = (?, ?) WHERE id = ?",
    );
    assert_eq!(
        stamped,
        format!("UPDATE t SET (a, gmt_modified) = (?, '{TS}') WHERE id = ?")
    );
    assert_eq!(stamped.matches("gmt_modified").count(), 1);
}

#[test]
fn stamping_is_idempotent_modulo_timestamp() {
    for (kind, sql) in [
        (StatementKind::Insert, "INSERT INTO t (a) VALUES (1), (2)"),
        (StatementKind::Insert, "INSERT INTO t (gmt_create, a) VALUES (?, ?)"),
        (StatementKind::Update, "UPDATE t SET a = ? WHERE id = ?"),
    ] {
        let once = stamp(kind, sql);
        let twice = stamp_with(AuditConfig::default(), LATER_TS, kind, &once);
        assert_eq!(twice.replace(LATER_TS, TS), once);
    }
}

#[test]
fn exempt_sql_is_returned_byte_for_byte() {
    let config =
        AuditConfig::from_properties([("ignoreTables", "^audit_.*, tmp_\\d+")]).expect("config");
    let interceptor = interceptor_at(config, TS);
    for (kind, sql) in [
        (StatementKind::Insert, "insert into audit_log(a)   values(1)"),
        (StatementKind::Insert, "INSERT INTO tmp_42 (a) VALUES (1)"),
        (StatementKind::Update, "update  audit_trail set a=1 where id=?"),
    ] {
        let prepared = interceptor.prepare_sql(kind, sql).expect("prepare sql");
        assert_eq!(prepared.into_sql(sql), sql);
    }
}

#[test]
fn substring_of_an_ignore_pattern_does_not_exempt() {
    let config = AuditConfig::from_properties([("ignoreTables", "log")]).expect("config");
    let stamped = stamp_with(
        config,
        TS,
        StatementKind::Insert,
        "INSERT INTO audit_log (a) VALUES (1)",
    );
    assert!(stamped.contains("gmt_create"));
}

#[test]
fn custom_column_names_are_used() {
    let config = AuditConfig::from_properties([
        ("createDateColumnName", "created_at"),
        ("updateDateColumnName", "updated_at"),
    ])
    .expect("config");
    assert_eq!(
        stamp_with(
            config.clone(),
            TS,
            StatementKind::Insert,
            "INSERT INTO t (a) VALUES (1)"
        ),
        format!("INSERT INTO t (a, created_at, updated_at) VALUES (1, '{TS}', '{TS}')")
    );
    assert_eq!(
        stamp_with(config, TS, StatementKind::Update, "UPDATE t SET a = 1"),
        format!("UPDATE t SET a = 1, updated_at = '{TS}'")
    );
}

#[test]
fn mysql_dialect_accepts_backtick_identifiers() {
    let config = AuditConfig::from_properties([("sqlDialect", "mysql")]).expect("config");
    let stamped = stamp_with(
        config,
        TS,
        StatementKind::Insert,
        "INSERT INTO `orders` (`id`) VALUES (1)",
    );
    assert_eq!(
        stamped,
        format!("INSERT INTO `orders` (`id`, gmt_create, gmt_modified) VALUES (1, '{TS}', '{TS}')")
    );
}

#[test]
fn select_and_delete_pass_through() {
    for sql in ["SELECT * FROM t", "DELETE FROM t WHERE id = 1"] {
        let prepared = interceptor_at(AuditConfig::default(), TS)
            .prepare_sql(StatementKind::Other, sql)
            .expect("prepare sql");
        assert_eq!(prepared, PreparedSql::Unchanged);
    }
}
