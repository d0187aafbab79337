//! Database layer
//!
//! Postgres implementation of the `IssueStore` trait from `localgov-core`,
//! plus pool setup and transaction utilities.

pub mod db;
pub mod setup;

pub use db::issues::PgIssueStore;
pub use db::transaction::with_transaction;
pub use setup::setup_database;
