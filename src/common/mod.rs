//! Common types and utilities shared across the pipeline stages.

// Submodule declarations
pub mod diagnostic;
pub mod error;
pub mod text;
pub mod unit;

// Re-exports for convenience
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{Error, Result};
