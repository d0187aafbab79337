//! Issue attachment upload pipeline
//!
//! The pipeline runs in three stages: `planner` turns a raw batch of
//! incoming files into an ordered list of upload plans, running strictly
//! sequentially so name assignment never races; `executor` drains the
//! plans across a bounded
//! worker pool, writing files and collecting metadata for the ones that
//! landed; `service` orchestrates both around issue creation and the
//! final transactional metadata commit.

pub mod executor;
pub mod planner;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
