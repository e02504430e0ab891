/// Paragraph types and implementation for DOCX documents.
use crate::common::unit::{mm_to_twip, pt_to_twip};
use crate::ooxml::error::Result;
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

pub use crate::ooxml::docx::format::{LineSpacing, ParagraphAlignment};
use super::bookmark::MutableBookmark;
use super::hyperlink::MutableHyperlink;
use super::image::MutableInlineImage;
use super::relmap::PartContext;
use super::run::{MutableRun, RunContent};

/// Elements that can appear in a paragraph.
#[derive(Debug, Clone)]
pub(crate) enum ParagraphElement {
    Run(MutableRun),
    Hyperlink(MutableHyperlink),
    InlineImage(MutableInlineImage),
    BookmarkStart(MutableBookmark),
    BookmarkEnd(u32),
}

/// A mutable paragraph in a document.
#[derive(Debug, Clone, Default)]
pub struct MutableParagraph {
    pub(crate) elements: Vec<ParagraphElement>,
    pub(crate) style: Option<String>,
    pub(crate) properties: ParagraphProperties,
}

impl MutableParagraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style_id: &str) -> Self {
        let mut para = Self::new();
        para.set_style(style_id);
        para
    }

    pub fn add_run(&mut self, run: MutableRun) -> &mut Self {
        self.elements.push(ParagraphElement::Run(run));
        self
    }

    /// Add a run with text.
    pub fn add_run_with_text(&mut self, text: &str) -> &mut Self {
        self.add_run(MutableRun::new(text))
    }

    pub fn add_hyperlink(&mut self, link: MutableHyperlink) -> &mut Self {
        self.elements.push(ParagraphElement::Hyperlink(link));
        self
    }

    pub fn add_picture(&mut self, image: MutableInlineImage) -> &mut Self {
        self.elements.push(ParagraphElement::InlineImage(image));
        self
    }

    /// Wrap everything added between this call and
    /// [`end_bookmark`](Self::end_bookmark) in a bookmark.
    pub fn start_bookmark(&mut self, bookmark: MutableBookmark) -> &mut Self {
        self.elements.push(ParagraphElement::BookmarkStart(bookmark));
        self
    }

    pub fn end_bookmark(&mut self, id: u32) -> &mut Self {
        self.elements.push(ParagraphElement::BookmarkEnd(id));
        self
    }

    pub fn add_page_break(&mut self) -> &mut Self {
        self.add_run(MutableRun::page_break())
    }

    pub fn set_style(&mut self, style_id: &str) {
        self.style = Some(style_id.to_string());
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn set_alignment(&mut self, alignment: ParagraphAlignment) {
        self.properties.alignment = Some(alignment);
    }

    /// Set spacing before this paragraph (in points).
    pub fn set_space_before(&mut self, points: f64) {
        self.properties.space_before = Some(pt_to_twip(points));
    }

    /// Set spacing after this paragraph (in points).
    pub fn set_space_after(&mut self, points: f64) {
        self.properties.space_after = Some(pt_to_twip(points));
    }

    pub fn set_line_spacing(&mut self, spacing: LineSpacing) {
        self.properties.line_spacing = Some(spacing);
    }

    /// Set left indentation (in millimetres).
    pub fn set_indent_left(&mut self, mm: f64) {
        self.properties.indent_left = Some(mm_to_twip(mm));
    }

    /// Set first line indentation (in millimetres); negative values hang.
    pub fn set_indent_first_line(&mut self, mm: f64) {
        self.properties.indent_first_line = Some(mm_to_twip(mm));
    }

    pub fn set_keep_next(&mut self, keep: bool) {
        self.properties.keep_next = keep;
    }

    /// Attach the paragraph to a numbering instance.
    pub fn set_numbering(&mut self, num_id: u32, ilvl: u32) {
        self.properties.numbering = Some(NumberingProperties { num_id, ilvl });
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Concatenated text of all runs, hyperlinks included.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for element in &self.elements {
            match element {
                ParagraphElement::Run(run) => text.push_str(run.get_text()),
                ParagraphElement::Hyperlink(link) => {
                    link.runs.iter().for_each(|r| text.push_str(r.get_text()))
                },
                _ => {},
            }
        }
        text
    }

    /// Whether the paragraph ends with a page break run.
    pub fn ends_with_page_break(&self) -> bool {
        matches!(
            self.elements.last(),
            Some(ParagraphElement::Run(run)) if run.content == RunContent::PageBreak
        )
    }

    pub(crate) fn to_xml<'a>(&'a self, xml: &mut String, ctx: &mut PartContext<'a>) -> Result<()> {
        self.write_xml(xml, ctx, None)
    }

    /// Write the paragraph, optionally closing a section with the given
    /// rendered `w:sectPr`.
    pub(crate) fn write_xml<'a>(
        &'a self,
        xml: &mut String,
        ctx: &mut PartContext<'a>,
        section: Option<&str>,
    ) -> Result<()> {
        xml.push_str("<w:p>");
        if self.style.is_some() || self.properties.has_properties() || section.is_some() {
            xml.push_str("<w:pPr>");
            if let Some(ref style) = self.style {
                write!(xml, r#"<w:pStyle w:val="{}"/>"#, escape_xml(style))?;
            }
            self.properties.to_xml(xml)?;
            if let Some(sect_pr) = section {
                xml.push_str(sect_pr);
            }
            xml.push_str("</w:pPr>");
        }

        for element in &self.elements {
            match element {
                ParagraphElement::Run(run) => run.to_xml(xml)?,
                ParagraphElement::Hyperlink(link) => link.to_xml(xml, ctx)?,
                ParagraphElement::InlineImage(image) => image.to_xml(xml, ctx)?,
                ParagraphElement::BookmarkStart(bookmark) => bookmark.to_xml_start(xml)?,
                ParagraphElement::BookmarkEnd(id) => {
                    write!(xml, r#"<w:bookmarkEnd w:id="{}"/>"#, id)?
                },
            }
        }

        xml.push_str("</w:p>");
        Ok(())
    }
}

/// Paragraph properties.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParagraphProperties {
    pub(crate) keep_next: bool,
    pub(crate) numbering: Option<NumberingProperties>,
    pub(crate) space_before: Option<u32>,
    pub(crate) space_after: Option<u32>,
    pub(crate) line_spacing: Option<LineSpacing>,
    pub(crate) indent_left: Option<i32>,
    pub(crate) indent_first_line: Option<i32>,
    pub(crate) alignment: Option<ParagraphAlignment>,
}

impl ParagraphProperties {
    pub(crate) fn has_properties(&self) -> bool {
        self.keep_next
            || self.alignment.is_some()
            || self.numbering.is_some()
            || self.space_before.is_some()
            || self.space_after.is_some()
            || self.line_spacing.is_some()
            || self.indent_left.is_some()
            || self.indent_first_line.is_some()
    }

    /// Children follow the `CT_PPr` sequence order.
    fn to_xml(&self, xml: &mut String) -> Result<()> {
        if self.keep_next {
            xml.push_str("<w:keepNext/>");
        }

        if let Some(ref numbering) = self.numbering {
            write!(
                xml,
                r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
                numbering.ilvl, numbering.num_id
            )?;
        }

        if self.space_before.is_some() || self.space_after.is_some() || self.line_spacing.is_some()
        {
            xml.push_str("<w:spacing");
            if let Some(before) = self.space_before {
                write!(xml, r#" w:before="{}""#, before)?;
            }
            if let Some(after) = self.space_after {
                write!(xml, r#" w:after="{}""#, after)?;
            }
            if let Some(ref line_spacing) = self.line_spacing {
                write!(
                    xml,
                    r#" w:line="{}" w:lineRule="auto""#,
                    line_spacing.line_value()
                )?;
            }
            xml.push_str("/>");
        }

        if self.indent_left.is_some() || self.indent_first_line.is_some() {
            xml.push_str("<w:ind");
            if let Some(left) = self.indent_left {
                write!(xml, r#" w:left="{}""#, left)?;
            }
            if let Some(first_line) = self.indent_first_line {
                if first_line >= 0 {
                    write!(xml, r#" w:firstLine="{}""#, first_line)?;
                } else {
                    write!(xml, r#" w:hanging="{}""#, -first_line)?;
                }
            }
            xml.push_str("/>");
        }

        if let Some(alignment) = self.alignment {
            write!(xml, r#"<w:jc w:val="{}"/>"#, alignment.as_str())?;
        }
        Ok(())
    }
}

/// Numbering properties for lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumberingProperties {
    pub(crate) num_id: u32,
    pub(crate) ilvl: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(para: &MutableParagraph) -> String {
        let mut ctx = PartContext::new();
        let mut xml = String::new();
        para.to_xml(&mut xml, &mut ctx).unwrap();
        xml
    }

    #[test]
    fn test_bare_paragraph() {
        let mut para = MutableParagraph::new();
        para.add_run_with_text("Текст");
        assert_eq!(
            render(&para),
            r#"<w:p><w:r><w:t xml:space="preserve">Текст</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_property_order() {
        let mut para = MutableParagraph::with_style("ListParagraph");
        para.set_alignment(ParagraphAlignment::Center);
        para.set_keep_next(true);
        para.set_numbering(3, 1);
        para.set_space_before(8.0);
        para.set_line_spacing(LineSpacing::Single);
        para.set_indent_first_line(0.0);
        let xml = render(&para);
        assert!(xml.starts_with(
            r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:keepNext/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr><w:spacing w:before="160" w:line="240" w:lineRule="auto"/><w:ind w:firstLine="0"/><w:jc w:val="center"/></w:pPr>"#
        ));
    }

    #[test]
    fn test_hanging_indent() {
        let mut para = MutableParagraph::new();
        para.set_indent_left(22.5);
        para.set_indent_first_line(-5.0);
        assert!(render(&para).contains(r#"<w:ind w:left="1276" w:hanging="283"/>"#));
    }

    #[test]
    fn test_section_break_in_properties() {
        let mut para = MutableParagraph::new();
        para.add_run_with_text("end");
        let mut ctx = PartContext::new();
        let mut xml = String::new();
        para.write_xml(&mut xml, &mut ctx, Some("<w:sectPr/>")).unwrap();
        assert!(xml.starts_with("<w:p><w:pPr><w:sectPr/></w:pPr>"));
    }

    #[test]
    fn test_bookmark_wraps_runs() {
        let mut para = MutableParagraph::new();
        para.start_bookmark(MutableBookmark::new(0, "intro"))
            .add_run_with_text("Введение")
            .end_bookmark(0);
        let xml = render(&para);
        let start = xml.find("bookmarkStart").unwrap();
        let text = xml.find("Введение").unwrap();
        let end = xml.find("bookmarkEnd").unwrap();
        assert!(start < text && text < end);
    }

    #[test]
    fn test_text_and_page_break() {
        let mut para = MutableParagraph::new();
        para.add_run_with_text("a").add_page_break();
        assert_eq!(para.text(), "a");
        assert!(para.ends_with_page_break());
    }
}
