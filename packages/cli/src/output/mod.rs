use audit_stamp_engine::BoundSql;
use comfy_table::{presets::UTF8_BORDERS_ONLY, Cell, ContentArrangement, Row, Table};

#[derive(Debug, Clone)]
pub struct RewriteReport {
    pub original_sql: String,
    pub bound: BoundSql,
    pub changed: bool,
    pub removed_bindings: usize,
}

pub fn print_report_table(report: &RewriteReport) {
    println!("{}", report.bound.sql);
    if !report.changed {
        println!("(unchanged)");
    }

    if !report.bound.parameter_mappings.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(Row::from(vec![
                Cell::new("#"),
                Cell::new("property"),
                Cell::new("jdbc type"),
            ]));
        for (index, mapping) in report.bound.parameter_mappings.iter().enumerate() {
            table.add_row(Row::from(vec![
                Cell::new(index + 1),
                Cell::new(&mapping.property),
                Cell::new(mapping.jdbc_type.as_deref().unwrap_or("")),
            ]));
        }
        println!("{table}");
    }

    println!(
        "({} bindings, {} removed)",
        report.bound.parameter_mappings.len(),
        report.removed_bindings
    );
}

pub fn print_report_json(report: &RewriteReport) {
    println!(
        "{}",
        serde_json::to_string_pretty(&report_to_json(report)).unwrap_or_else(|_| "{}".to_string())
    );
}

fn report_to_json(report: &RewriteReport) -> serde_json::Value {
    serde_json::json!({
        "originalSql": report.original_sql,
        "sql": report.bound.sql,
        "changed": report.changed,
        "parameterMappings": report.bound.parameter_mappings,
        "removedBindings": report.removed_bindings,
    })
}
