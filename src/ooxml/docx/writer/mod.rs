//! Mutable document writer components for DOCX.
//!
//! The writer builds an in-memory model (sections of paragraphs, tables and
//! a TOC) and serializes it straight to WordprocessingML parts.

pub mod bookmark;
pub mod doc;
pub mod hyperlink;
pub mod image;
pub mod numbering;
pub mod package;
pub mod paragraph;
pub(crate) mod relmap;
pub mod run;
pub mod section;
pub mod style;
pub mod table;
pub mod toc;

pub use bookmark::{MutableBookmark, bookmark_name};
pub use doc::{BodyElement, MutableDocument, MutableSection};
pub use hyperlink::{HyperlinkTarget, MutableHyperlink};
pub use image::MutableInlineImage;
pub use numbering::{MutableNumbering, NumberFormat, NumberingDefinition, NumberingLevel};
pub use package::PackageWriter;
pub use paragraph::MutableParagraph;
pub use run::{MutableRun, RunContent};
pub use section::SectionProperties;
pub use style::{MutableStyle, StyleType, generate_styles_xml, report_styles};
pub use table::{MutableCell, MutableRow, MutableTable};
pub use toc::TableOfContents;
