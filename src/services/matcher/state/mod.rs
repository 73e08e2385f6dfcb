pub mod cancel;
pub mod catalog_store;
pub mod master_catalog;
pub mod recent_results;
pub mod search_cache;
pub mod tables;
