pub mod database;
pub mod services;
pub mod types;

/// Environment variable naming the catalog database.
pub const DATABASE_URL_ENV: &str = "WASTESORT_DATABASE_URL";

/// Environment variable pointing at a JSON `MatchTables` override.
pub const TABLES_PATH_ENV: &str = "WASTESORT_TABLES";
