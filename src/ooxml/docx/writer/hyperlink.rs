/// Hyperlink support for DOCX documents.
use super::bookmark::bookmark_name;
use super::relmap::PartContext;
use super::run::MutableRun;
use crate::ooxml::error::Result;
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// Where a hyperlink points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperlinkTarget {
    /// External URL, stored as a relationship
    External(String),
    /// Bookmark inside the document
    Anchor(String),
}

/// A mutable hyperlink in a document.
///
/// The contained runs are given the `Hyperlink` character style when they
/// carry no other style.
#[derive(Debug, Clone)]
pub struct MutableHyperlink {
    pub(crate) target: HyperlinkTarget,
    pub(crate) runs: Vec<MutableRun>,
}

impl MutableHyperlink {
    pub fn new(target: HyperlinkTarget) -> Self {
        Self {
            target,
            runs: Vec::new(),
        }
    }

    pub fn add_run(&mut self, mut run: MutableRun) -> &mut Self {
        if run.properties.style.is_none() {
            run.style("Hyperlink");
        }
        self.runs.push(run);
        self
    }

    pub(crate) fn to_xml(&self, xml: &mut String, ctx: &mut PartContext<'_>) -> Result<()> {
        match &self.target {
            HyperlinkTarget::External(url) => {
                let r_id = ctx.rels.add_hyperlink(url);
                write!(xml, r#"<w:hyperlink r:id="{}" w:history="1">"#, r_id)?;
            },
            HyperlinkTarget::Anchor(anchor) => {
                write!(
                    xml,
                    r#"<w:hyperlink w:anchor="{}" w:history="1">"#,
                    escape_xml(&bookmark_name(anchor))
                )?;
            },
        }
        for run in &self.runs {
            run.to_xml(xml)?;
        }
        xml.push_str("</w:hyperlink>");
        Ok(())
    }
}
