/// Document writer implementation for DOCX.
use crate::ooxml::common::DocumentProperties;
use crate::ooxml::error::Result;
use crate::ooxml::xml::{WORD_NAMESPACES, XML_DECLARATION};
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use super::numbering::MutableNumbering;
use super::package::{self, PackageWriter};
use super::paragraph::MutableParagraph;
use super::relmap::{PartContext, RelationshipKind};
use super::section::SectionProperties;
use super::style::{MutableStyle, generate_styles_xml, report_styles};
use super::table::MutableTable;
use super::toc::TableOfContents;

/// Block-level content of a section.
#[derive(Debug, Clone)]
pub enum BodyElement {
    Paragraph(MutableParagraph),
    Table(MutableTable),
    TableOfContents(TableOfContents),
}

impl BodyElement {
    pub(crate) fn to_xml<'a>(&'a self, xml: &mut String, ctx: &mut PartContext<'a>) -> Result<()> {
        match self {
            Self::Paragraph(p) => p.to_xml(xml, ctx),
            Self::Table(t) => t.to_xml(xml, ctx),
            Self::TableOfContents(toc) => toc.to_xml(xml),
        }
    }
}

/// A run of body content sharing page setup and footer.
#[derive(Debug, Clone, Default)]
pub struct MutableSection {
    pub(crate) body: Vec<BodyElement>,
    pub(crate) properties: SectionProperties,
    pub(crate) footer: Vec<MutableParagraph>,
}

impl MutableSection {
    pub fn new(properties: SectionProperties) -> Self {
        Self {
            body: Vec::new(),
            properties,
            footer: Vec::new(),
        }
    }

    pub fn properties(&self) -> &SectionProperties {
        &self.properties
    }

    pub fn body(&self) -> &[BodyElement] {
        &self.body
    }

    pub fn footer(&self) -> &[MutableParagraph] {
        &self.footer
    }

    pub fn add_footer_paragraph(&mut self, para: MutableParagraph) {
        self.footer.push(para);
    }

    fn footer_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(512);
        xml.push_str(XML_DECLARATION);
        write!(xml, "<w:ftr {WORD_NAMESPACES}>")?;
        // Footers carry plain runs only, so nothing registers relationships here.
        let mut ctx = PartContext::new();
        for para in &self.footer {
            para.to_xml(&mut xml, &mut ctx)?;
        }
        if self.footer.is_empty() {
            xml.push_str("<w:p/>");
        }
        xml.push_str("</w:ftr>");
        Ok(xml)
    }
}

/// A mutable Word document for writing.
///
/// Content is appended to the last section; [`add_section`](Self::add_section)
/// starts a new one.
#[derive(Debug, Clone)]
pub struct MutableDocument {
    sections: Vec<MutableSection>,
    numbering: MutableNumbering,
    styles: Vec<MutableStyle>,
    properties: DocumentProperties,
    update_fields: bool,
}

impl MutableDocument {
    /// Empty document with one default section and the report style set.
    pub fn new() -> Self {
        Self {
            sections: vec![MutableSection::default()],
            numbering: MutableNumbering::new(),
            styles: report_styles(),
            properties: DocumentProperties::new(),
            update_fields: false,
        }
    }

    /// Start a new section; returns it for footer setup.
    pub fn add_section(&mut self, properties: SectionProperties) -> &mut MutableSection {
        self.sections.push(MutableSection::new(properties));
        self.current_section_mut()
    }

    pub fn sections(&self) -> &[MutableSection] {
        &self.sections
    }

    pub fn current_section_mut(&mut self) -> &mut MutableSection {
        if self.sections.is_empty() {
            self.sections.push(MutableSection::default());
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Replace the first section's setup; used before any content is added.
    pub fn first_section_mut(&mut self) -> &mut MutableSection {
        if self.sections.is_empty() {
            self.sections.push(MutableSection::default());
        }
        &mut self.sections[0]
    }

    pub fn add_paragraph(&mut self, para: MutableParagraph) {
        self.current_section_mut().body.push(BodyElement::Paragraph(para));
    }

    pub fn add_table(&mut self, table: MutableTable) {
        self.current_section_mut().body.push(BodyElement::Table(table));
    }

    pub fn add_element(&mut self, element: BodyElement) {
        self.current_section_mut().body.push(element);
    }

    pub fn add_table_of_contents(&mut self, toc: TableOfContents) {
        self.current_section_mut()
            .body
            .push(BodyElement::TableOfContents(toc));
    }

    /// The last body element of the current section, when it is a paragraph.
    pub fn last_paragraph_mut(&mut self) -> Option<&mut MutableParagraph> {
        match self.current_section_mut().body.last_mut() {
            Some(BodyElement::Paragraph(p)) => Some(p),
            _ => None,
        }
    }

    pub fn numbering(&self) -> &MutableNumbering {
        &self.numbering
    }

    pub fn numbering_mut(&mut self) -> &mut MutableNumbering {
        &mut self.numbering
    }

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: DocumentProperties) {
        self.properties = properties;
    }

    /// Ask Word to refresh fields (the TOC) when the file is opened.
    pub fn set_update_fields(&mut self, update: bool) {
        self.update_fields = update;
    }

    pub fn paragraph_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.body)
            .filter(|e| matches!(e, BodyElement::Paragraph(_)))
            .count()
    }

    /// Body XML; relationships and media are collected into `ctx`.
    pub(crate) fn to_xml<'a>(&'a self, ctx: &mut PartContext<'a>) -> Result<String> {
        let mut xml = String::with_capacity(8192);
        xml.push_str(XML_DECLARATION);
        write!(xml, "<w:document {WORD_NAMESPACES}><w:body>")?;

        let count = self.sections.len();
        for (i, section) in self.sections.iter().enumerate() {
            let footer_id = ctx
                .rels
                .add(RelationshipKind::Footer, format!("footer{}.xml", i + 1));
            let mut sect_pr = String::with_capacity(256);
            section.properties.to_xml(&mut sect_pr, Some(&footer_id))?;

            let (closing, rest) = match section.body.split_last() {
                Some((BodyElement::Paragraph(p), rest)) if i + 1 < count => (Some(p), rest),
                _ => (None, section.body.as_slice()),
            };
            for element in rest {
                element.to_xml(&mut xml, ctx)?;
            }

            if i + 1 == count {
                xml.push_str(&sect_pr);
            } else if let Some(para) = closing {
                // A non-final section ends in the properties of its last paragraph.
                para.write_xml(&mut xml, ctx, Some(&sect_pr))?;
            } else {
                write!(xml, "<w:p><w:pPr>{sect_pr}</w:pPr></w:p>")?;
            }
        }

        xml.push_str("</w:body></w:document>");
        Ok(xml)
    }

    fn settings_xml(&self) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#);
        xml.push_str(r#"<w:defaultTabStop w:val="708"/><w:characterSpacingControl w:val="doNotCompress"/>"#);
        if self.update_fields {
            xml.push_str(r#"<w:updateFields w:val="true"/>"#);
        }
        xml.push_str(r#"<w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat>"#);
        xml.push_str("</w:settings>");
        xml
    }

    /// Write the whole package to `writer`.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut ctx = PartContext::new();
        let document_xml = self.to_xml(&mut ctx)?;

        let mut package = PackageWriter::with_writer(writer);
        package.add_part("word/document.xml", package::MAIN_DOCUMENT, &document_xml)?;
        package.add_relationships("word/_rels/document.xml.rels", &ctx.rels.to_xml()?)?;
        package.add_part("word/styles.xml", package::STYLES, &generate_styles_xml(&self.styles)?)?;
        package.add_part("word/numbering.xml", package::NUMBERING, &self.numbering.to_xml()?)?;
        package.add_part("word/settings.xml", package::SETTINGS, &self.settings_xml())?;
        for (i, section) in self.sections.iter().enumerate() {
            package.add_part(
                &format!("word/footer{}.xml", i + 1),
                package::FOOTER,
                &section.footer_xml()?,
            )?;
        }
        for media in &ctx.media {
            package.add_media(&format!("word/media/{}", media.name), media.format, media.data)?;
        }
        package.add_part("docProps/core.xml", package::CORE_PROPERTIES, &self.properties.to_xml())?;
        package.add_part(
            "docProps/app.xml",
            package::EXTENDED_PROPERTIES,
            &self.properties.to_app_xml(),
        )?;
        package.finish()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

impl Default for MutableDocument {
    fn default() -> Self {
        Self::new()
    }
}
