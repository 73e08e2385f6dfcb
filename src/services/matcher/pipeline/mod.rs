pub mod catalog_search;
pub mod identify;
pub mod label_source;
