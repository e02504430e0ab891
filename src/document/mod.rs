//! Document model shared by every pipeline stage.
//!
//! The parser builds a [`Document`] of raw strings, the enrichment engine
//! rewrites it in place, the inline resolver turns it into a
//! [`RunicDocument`], and the serializer consumes that.

pub mod node;
pub mod rune;

pub use node::{
    Code, Document, ExternalDoc, Image, List, ListEntry, ListItem, Node, Runes, Section,
    SectionBreak, Settings, Table, Text, Title,
};
pub use rune::{Emphasis, LinkTarget, Rune, ScriptLang, plain_text};

/// Document whose text fields are resolved into styled atoms.
pub type RunicDocument = Document<Runes>;
