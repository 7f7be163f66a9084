//! Core types for ebook-index.
//!
//! This module contains the document/format listing schema and the build
//! metadata captured from the CI environment.

pub mod build_env;
pub mod schema;

// Re-export key types for convenience
pub use build_env::BuildMetadata;
pub use schema::{BOOK_FORMATS, DocumentRow, FormatSlot};
