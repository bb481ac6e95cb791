pub mod benefits;
pub mod common;
pub mod eligibility;
pub mod library;
