//! Database repositories for the data access layer

pub mod issues;
pub mod transaction;

pub use issues::PgIssueStore;
