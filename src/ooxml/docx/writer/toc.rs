/// Table of Contents support for DOCX documents.
///
/// The TOC is a complex field inside a block-level content control tagged as a
/// table-of-contents document part, so Word offers "Update Table" on it.
use crate::ooxml::error::Result;
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// A table of contents (TOC) field.
#[derive(Debug, Clone)]
pub struct TableOfContents {
    start_level: u32,
    end_level: u32,
    alias: Option<String>,
    placeholder: String,
}

impl TableOfContents {
    /// Levels 1-3 with hyperlinks.
    pub fn new() -> Self {
        Self {
            start_level: 1,
            end_level: 3,
            alias: None,
            placeholder: "Обновите поле, чтобы построить оглавление.".to_string(),
        }
    }

    pub fn heading_levels(mut self, start: u32, end: u32) -> Self {
        self.start_level = start.clamp(1, 9);
        self.end_level = end.clamp(self.start_level, 9);
        self
    }

    /// Name shown on the content control.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// `TOC \o "1-3" \h \z \u`
    pub fn build_field_instruction(&self) -> String {
        format!(
            r#"TOC \o "{}-{}" \h \z \u"#,
            self.start_level, self.end_level
        )
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:sdt><w:sdtPr>");
        if let Some(ref alias) = self.alias {
            write!(xml, r#"<w:alias w:val="{}"/>"#, escape_xml(alias))?;
        }
        xml.push_str(r#"<w:docPartObj><w:docPartGallery w:val="Table of Contents"/><w:docPartUnique/></w:docPartObj>"#);
        xml.push_str("</w:sdtPr><w:sdtContent><w:p>");
        xml.push_str(r#"<w:r><w:fldChar w:fldCharType="begin" w:dirty="true"/></w:r>"#);
        write!(
            xml,
            r#"<w:r><w:instrText xml:space="preserve"> {} </w:instrText></w:r>"#,
            escape_xml(&self.build_field_instruction())
        )?;
        xml.push_str(r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r>"#);
        write!(xml, "<w:r><w:t>{}</w:t></w:r>", escape_xml(&self.placeholder))?;
        xml.push_str(r#"<w:r><w:fldChar w:fldCharType="end"/></w:r>"#);
        xml.push_str("</w:p></w:sdtContent></w:sdt>");
        Ok(())
    }
}

impl Default for TableOfContents {
    fn default() -> Self {
        Self::new()
    }
}
