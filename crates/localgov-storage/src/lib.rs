//! Attachment storage backends
//!
//! This crate defines the `AttachmentStorage` trait the upload pipeline
//! writes through, plus the local-filesystem implementation. Storage is a
//! directory-like namespace keyed by issue id; the physical location is an
//! implementation detail behind the trait.

pub mod local;
pub mod traits;

pub use local::LocalAttachmentStorage;
pub use traits::{AttachmentStorage, StorageError, StorageResult};
