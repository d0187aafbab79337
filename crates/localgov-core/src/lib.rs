//! Localgov Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! filename handling shared across all localgov components, plus the
//! `IssueStore` trait that persistence backends implement.

pub mod config;
pub mod error;
pub mod filename;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::AppError;
pub use filename::{sanitize_file_name, unique_file_name, NameRegistry};
pub use store::IssueStore;
