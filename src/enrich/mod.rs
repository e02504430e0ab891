//! Enrichment engine: report conventions applied to a parsed document.
//!
//! Heading rules run over the first section only, where the report front
//! matter lives. The list normalizer then walks every list in every section.
//! Shape mismatches are returned as diagnostics; enrichment itself never
//! fails.
pub mod headings;
pub mod lists;

pub use headings::Heading;

use crate::common::Diagnostic;
use crate::document::Document;

/// Rewrite `document` in place, returning the non-fatal findings.
pub fn enrich(document: &mut Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if let Some(first) = document.sections.first_mut() {
        headings::apply(&mut first.nodes, &mut diagnostics);
    }
    for section in &mut document.sections {
        lists::normalize_nodes(&mut section.nodes);
    }
    diagnostics
}
