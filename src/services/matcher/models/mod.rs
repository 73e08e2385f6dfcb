pub mod decision_log;
pub mod types;
