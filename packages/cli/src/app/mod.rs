mod run;

pub use run::run;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub create_column: String,
    pub update_column: String,
    pub ignore_tables: String,
    pub dialect: String,
}
