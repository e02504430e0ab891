//! Unified error types for md2gost.
//!
//! Inner layers (the DOCX writer) keep their own error enums; this module
//! folds them into one type presented at the crate boundary.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
