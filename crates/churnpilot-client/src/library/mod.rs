//! Template catalog, issuer normalization, fuzzy matching and additive
//! credit enrichment.

pub mod catalog;
pub mod enrich;
pub mod matcher;
pub mod normalize;
