pub mod categorizer;
pub mod normalizer;
pub mod scoring;
pub mod term_expander;
pub mod variant_resolver;
