//! md2gost - a compiler from a line-oriented markup dialect to GOST-styled
//! Word reports.
//!
//! The pipeline has four stages sharing one document model:
//!
//! - **Structural parser** ([`markup`]): source lines to a tree of typed nodes
//! - **Enrichment** ([`enrich`]): conventional report headings rewrite the
//!   nodes around them (table of contents, glossary, references, ...)
//! - **Inline resolver** ([`inline`]): raw strings to styled atoms
//!   (emphasis, links, anchors, line breaks, colors, script language)
//! - **Serializer** ([`serialize`]): the resolved tree to a `.docx` package,
//!   written by the WordprocessingML writer in [`ooxml`]
//!
//! [`render`] wraps the stages for files on disk and drives the optional
//! external finishing stage (Word macros and PDF export).
//!
//! # Example - Compiling markup in memory
//!
//! ```rust
//! use md2gost::serialize::SerializeOptions;
//!
//! # fn main() -> Result<(), md2gost::Error> {
//! let source = "# Введение\nЦель работы - изучить **формат** отчета.";
//! let compiled = md2gost::compile(source, &SerializeOptions::new("."))?;
//! assert!(compiled.diagnostics.is_empty());
//! let bytes = compiled.document.to_bytes()?;
//! assert!(bytes.starts_with(b"PK"));
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Rendering a file
//!
//! ```no_run
//! use md2gost::config::RenderOptions;
//! use md2gost::render::{NoProgress, Renderer};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), md2gost::Error> {
//! let renderer = Renderer::new(RenderOptions::discover(".")?);
//! let outcome = renderer.render(Path::new("report.g.md"), &mut NoProgress).await?;
//! println!("written {}", outcome.output.display());
//! # Ok(())
//! # }
//! ```

/// Shared errors, diagnostics, text and unit helpers
pub mod common;

/// Render configuration (`md2gost.yaml`)
pub mod config;

/// Document model shared by every stage
pub mod document;

/// Report conventions applied after parsing
pub mod enrich;

/// Inline run resolver
pub mod inline;

/// Line classifier and structural parser
pub mod markup;

/// WordprocessingML (DOCX) writer
///
/// This module provides the low-level package writer the serializer targets:
/// paragraphs, runs, tables, numbering, sections and document properties.
pub mod ooxml;

/// File-level render pipeline and the external finishing stage
pub mod render;

/// Resolved document to Word document
pub mod serialize;

pub use common::{Diagnostic, DiagnosticKind, Error, Result};

use crate::inline::{HueCursor, resolve_document};
use crate::ooxml::docx::MutableDocument;
use crate::serialize::SerializeOptions;

/// A compiled document plus the warnings collected on the way.
#[derive(Debug)]
pub struct Compiled {
    pub document: MutableDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run parse, enrich, resolve and serialize over `source`.
pub fn compile(source: &str, options: &SerializeOptions) -> Result<Compiled> {
    let parsed = markup::parse(source)?;
    let mut diagnostics = parsed.diagnostics;
    let mut document = parsed.document;
    diagnostics.extend(enrich::enrich(&mut document));
    let runic = resolve_document(document, &mut HueCursor::new());
    let document = serialize::serialize(&runic, options)?;
    Ok(Compiled {
        document,
        diagnostics,
    })
}
