/// Run types and implementation for DOCX documents.
use crate::ooxml::error::Result;
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// Run content type.
#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    /// Plain text
    Text(String),
    /// `PAGE` field
    PageNumber,
    /// Page break
    PageBreak,
}

/// A mutable run.
///
/// Runs contain text and character formatting.
#[derive(Debug, Clone)]
pub struct MutableRun {
    pub(crate) content: RunContent,
    pub(crate) properties: RunProperties,
}

impl MutableRun {
    pub fn new(text: &str) -> Self {
        Self {
            content: RunContent::Text(text.to_string()),
            properties: RunProperties::default(),
        }
    }

    /// Run holding a page number field.
    pub fn page_number() -> Self {
        Self {
            content: RunContent::PageNumber,
            properties: RunProperties::default(),
        }
    }

    /// Run holding a page break.
    pub fn page_break() -> Self {
        Self {
            content: RunContent::PageBreak,
            properties: RunProperties::default(),
        }
    }

    pub fn get_text(&self) -> &str {
        match &self.content {
            RunContent::Text(s) => s,
            _ => "",
        }
    }

    pub fn bold(&mut self, bold: bool) -> &mut Self {
        self.properties.bold = bold;
        self
    }

    pub fn italic(&mut self, italic: bool) -> &mut Self {
        self.properties.italic = italic;
        self
    }

    /// Set font size in half-points (e.g., 24 = 12pt).
    pub fn font_size(&mut self, size: u32) -> &mut Self {
        self.properties.font_size = Some(size);
        self
    }

    pub fn font_name(&mut self, name: &str) -> &mut Self {
        self.properties.font_name = Some(name.to_string());
        self
    }

    /// Set text color using hex RGB (e.g., "FF0000" for red).
    pub fn color(&mut self, color: &str) -> &mut Self {
        self.properties.color = Some(color.to_string());
        self
    }

    /// Language tag such as `en-US`.
    pub fn lang(&mut self, tag: &str) -> &mut Self {
        self.properties.lang = Some(tag.to_string());
        self
    }

    /// Character style id.
    pub fn style(&mut self, style: &str) -> &mut Self {
        self.properties.style = Some(style.to_string());
        self
    }

    /// Emit a line break before the run content.
    pub fn break_before(&mut self) -> &mut Self {
        self.properties.break_before = true;
        self
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        match self.content {
            RunContent::PageNumber => {
                self.write_field_char(xml, "begin");
                xml.push_str("<w:r>");
                self.properties.to_xml(xml)?;
                xml.push_str(r#"<w:instrText xml:space="preserve"> PAGE </w:instrText></w:r>"#);
                self.write_field_char(xml, "separate");
                xml.push_str("<w:r>");
                self.properties.to_xml(xml)?;
                xml.push_str("<w:t>1</w:t></w:r>");
                self.write_field_char(xml, "end");
                Ok(())
            },
            _ => {
                xml.push_str("<w:r>");
                self.properties.to_xml(xml)?;
                if self.properties.break_before {
                    xml.push_str("<w:br/>");
                }
                match &self.content {
                    RunContent::Text(text) if !text.is_empty() => {
                        write!(
                            xml,
                            r#"<w:t xml:space="preserve">{}</w:t>"#,
                            escape_xml(text)
                        )?;
                    },
                    RunContent::PageBreak => xml.push_str(r#"<w:br w:type="page"/>"#),
                    _ => {},
                }
                xml.push_str("</w:r>");
                Ok(())
            },
        }
    }

    fn write_field_char(&self, xml: &mut String, kind: &str) {
        xml.push_str(r#"<w:r><w:fldChar w:fldCharType=""#);
        xml.push_str(kind);
        xml.push_str(r#""/></w:r>"#);
    }
}

/// Run properties.
#[derive(Debug, Clone, Default)]
pub(crate) struct RunProperties {
    pub(crate) style: Option<String>,
    pub(crate) bold: bool,
    pub(crate) italic: bool,
    pub(crate) font_size: Option<u32>,
    pub(crate) font_name: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) lang: Option<String>,
    pub(crate) break_before: bool,
}

impl RunProperties {
    pub(crate) fn has_properties(&self) -> bool {
        self.style.is_some()
            || self.bold
            || self.italic
            || self.font_size.is_some()
            || self.font_name.is_some()
            || self.color.is_some()
            || self.lang.is_some()
    }

    /// Children follow the `CT_RPr` sequence order.
    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        if !self.has_properties() {
            return Ok(());
        }
        xml.push_str("<w:rPr>");
        if let Some(ref style) = self.style {
            write!(xml, r#"<w:rStyle w:val="{}"/>"#, escape_xml(style))?;
        }
        if let Some(ref font_name) = self.font_name {
            let font = escape_xml(font_name);
            write!(
                xml,
                r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
            )?;
        }
        if self.bold {
            xml.push_str("<w:b/>");
        }
        if self.italic {
            xml.push_str("<w:i/>");
        }
        if let Some(ref color) = self.color {
            write!(xml, r#"<w:color w:val="{}"/>"#, color)?;
        }
        if let Some(size) = self.font_size {
            write!(xml, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#)?;
        }
        if let Some(ref lang) = self.lang {
            write!(xml, r#"<w:lang w:val="{}"/>"#, lang)?;
        }
        xml.push_str("</w:rPr>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(run: &MutableRun) -> String {
        let mut xml = String::new();
        run.to_xml(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_plain_run() {
        let xml = render(&MutableRun::new("a < b"));
        assert_eq!(xml, r#"<w:r><w:t xml:space="preserve">a &lt; b</w:t></w:r>"#);
    }

    #[test]
    fn test_property_order() {
        let mut run = MutableRun::new("x");
        run.bold(true).italic(true).color("FF0000").font_size(24).lang("en-US");
        let xml = render(&run);
        let b = xml.find("<w:b/>").unwrap();
        let color = xml.find("<w:color").unwrap();
        let sz = xml.find("<w:sz ").unwrap();
        let lang = xml.find("<w:lang").unwrap();
        assert!(b < color && color < sz && sz < lang);
    }

    #[test]
    fn test_break_before_text() {
        let mut run = MutableRun::new("next");
        run.break_before();
        assert!(render(&run).contains(r#"<w:br/><w:t xml:space="preserve">next"#));
    }

    #[test]
    fn test_page_field() {
        let xml = render(&MutableRun::page_number());
        assert!(xml.contains(r#"w:fldCharType="begin""#));
        assert!(xml.contains(" PAGE "));
        assert!(xml.ends_with(r#"<w:r><w:fldChar w:fldCharType="end"/></w:r>"#));
    }

    #[test]
    fn test_page_break() {
        assert_eq!(
            render(&MutableRun::page_break()),
            r#"<w:r><w:br w:type="page"/></w:r>"#
        );
    }
}
