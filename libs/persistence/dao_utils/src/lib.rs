pub mod error_handling;
pub mod query_helpers;
