//! Office Open XML (OOXML) output.
//!
//! A minimal WordprocessingML writer: the document model in [`docx::writer`]
//! is built in memory and packed into an OPC (ZIP) container with the parts
//! Word needs to open it.
//!
//! # Example
//!
//! ```rust
//! use md2gost::ooxml::docx::writer::{MutableDocument, MutableParagraph};
//!
//! let mut doc = MutableDocument::new();
//! let mut para = MutableParagraph::with_style("Title");
//! para.add_run_with_text("ВВЕДЕНИЕ");
//! doc.add_paragraph(para);
//! let bytes = doc.to_bytes()?;
//! assert!(bytes.starts_with(b"PK"));
//! # Ok::<(), md2gost::ooxml::OoxmlError>(())
//! ```
pub mod common;
pub mod docx;
pub mod error;
pub mod xml;

pub use common::DocumentProperties;
pub use error::{OoxmlError, Result};
