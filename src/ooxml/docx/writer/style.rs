/// Style writer support for DOCX documents.
///
/// Builds `word/styles.xml` from a list of style definitions. The report
/// style set lives in [`report_styles`].
use crate::common::unit::{mm_to_twip, pt_to_half_points};
use crate::ooxml::error::Result;
use crate::ooxml::xml::{XML_DECLARATION, escape_xml};
use std::fmt::Write as FmtWrite;

pub const BODY_FONT: &str = "Times New Roman";
pub const CODE_FONT: &str = "Courier New";
pub const DEFAULT_LANG: &str = "ru-RU";

/// Kind of style definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
}

impl StyleType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Character => "character",
        }
    }
}

/// A mutable style definition for writing.
#[derive(Debug, Clone)]
pub struct MutableStyle {
    style_id: String,
    name: String,
    style_type: StyleType,
    is_default: bool,
    based_on: Option<String>,
    next: Option<String>,
    priority: Option<i32>,
    is_quick_style: bool,
    keep_next: bool,
    outline_level: Option<u8>,
    font_name: Option<String>,
    /// Font size in half-points (e.g., 24 = 12pt)
    font_size: Option<u32>,
    bold: bool,
    underline: bool,
    caps: bool,
    color: Option<String>,
    alignment: Option<String>,
    space_before: Option<u32>,
    space_after: Option<u32>,
    line_spacing: Option<u32>,
    indent_left: Option<i32>,
    indent_first_line: Option<i32>,
}

impl MutableStyle {
    pub fn new(style_id: impl Into<String>, name: impl Into<String>, style_type: StyleType) -> Self {
        Self {
            style_id: style_id.into(),
            name: name.into(),
            style_type,
            is_default: false,
            based_on: None,
            next: None,
            priority: None,
            is_quick_style: false,
            keep_next: false,
            outline_level: None,
            font_name: None,
            font_size: None,
            bold: false,
            underline: false,
            caps: false,
            color: None,
            alignment: None,
            space_before: None,
            space_after: None,
            line_spacing: None,
            indent_left: None,
            indent_first_line: None,
        }
    }

    #[inline]
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    #[inline]
    pub fn style_type(&self) -> StyleType {
        self.style_type
    }

    #[inline]
    pub fn based_on(&self) -> Option<&str> {
        self.based_on.as_deref()
    }

    pub fn set_default(&mut self, is_default: bool) -> &mut Self {
        self.is_default = is_default;
        self
    }

    pub fn set_based_on(&mut self, based_on: &str) -> &mut Self {
        self.based_on = Some(based_on.to_string());
        self
    }

    pub fn set_next(&mut self, next: &str) -> &mut Self {
        self.next = Some(next.to_string());
        self
    }

    pub fn set_priority(&mut self, priority: i32) -> &mut Self {
        self.priority = Some(priority);
        self
    }

    pub fn set_quick_style(&mut self, is_quick_style: bool) -> &mut Self {
        self.is_quick_style = is_quick_style;
        self
    }

    pub fn set_keep_next(&mut self, keep_next: bool) -> &mut Self {
        self.keep_next = keep_next;
        self
    }

    /// Zero-based outline level picked up by the TOC field.
    pub fn set_outline_level(&mut self, level: u8) -> &mut Self {
        self.outline_level = Some(level);
        self
    }

    pub fn set_font_name(&mut self, font_name: &str) -> &mut Self {
        self.font_name = Some(font_name.to_string());
        self
    }

    /// Font size in points.
    pub fn set_font_size(&mut self, points: f64) -> &mut Self {
        self.font_size = Some(pt_to_half_points(points));
        self
    }

    pub fn set_bold(&mut self, bold: bool) -> &mut Self {
        self.bold = bold;
        self
    }

    pub fn set_underline(&mut self, underline: bool) -> &mut Self {
        self.underline = underline;
        self
    }

    pub fn set_caps(&mut self, caps: bool) -> &mut Self {
        self.caps = caps;
        self
    }

    pub fn set_color(&mut self, color: &str) -> &mut Self {
        self.color = Some(color.to_string());
        self
    }

    /// `w:jc` value such as `center` or `both`.
    pub fn set_alignment(&mut self, alignment: &str) -> &mut Self {
        self.alignment = Some(alignment.to_string());
        self
    }

    /// Spacing in twips.
    pub fn set_spacing(&mut self, before: Option<u32>, after: Option<u32>) -> &mut Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    /// Line spacing in 240ths of a line.
    pub fn set_line_spacing(&mut self, line: u32) -> &mut Self {
        self.line_spacing = Some(line);
        self
    }

    /// Indents in millimetres; a negative first line hangs.
    pub fn set_indent(&mut self, left: Option<f64>, first_line: Option<f64>) -> &mut Self {
        self.indent_left = left.map(mm_to_twip);
        self.indent_first_line = first_line.map(mm_to_twip);
        self
    }

    fn has_paragraph_properties(&self) -> bool {
        self.keep_next
            || self.outline_level.is_some()
            || self.alignment.is_some()
            || self.space_before.is_some()
            || self.space_after.is_some()
            || self.line_spacing.is_some()
            || self.indent_left.is_some()
            || self.indent_first_line.is_some()
    }

    fn has_run_properties(&self) -> bool {
        self.font_name.is_some()
            || self.font_size.is_some()
            || self.bold
            || self.underline
            || self.caps
            || self.color.is_some()
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<w:style w:type="{}" w:styleId="{}""#,
            self.style_type.as_str(),
            escape_xml(&self.style_id)
        )?;
        if self.is_default {
            xml.push_str(r#" w:default="1""#);
        }
        xml.push('>');

        write!(xml, r#"<w:name w:val="{}"/>"#, escape_xml(&self.name))?;
        if let Some(ref based_on) = self.based_on {
            write!(xml, r#"<w:basedOn w:val="{}"/>"#, escape_xml(based_on))?;
        }
        if let Some(ref next) = self.next {
            write!(xml, r#"<w:next w:val="{}"/>"#, escape_xml(next))?;
        }
        if let Some(priority) = self.priority {
            write!(xml, r#"<w:uiPriority w:val="{}"/>"#, priority)?;
        }
        if self.is_quick_style {
            xml.push_str("<w:qFormat/>");
        }

        if self.style_type == StyleType::Paragraph && self.has_paragraph_properties() {
            xml.push_str("<w:pPr>");
            if self.keep_next {
                xml.push_str("<w:keepNext/>");
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
                if let Some(line) = self.line_spacing {
                    write!(xml, r#" w:line="{}" w:lineRule="auto""#, line)?;
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
            if let Some(ref alignment) = self.alignment {
                write!(xml, r#"<w:jc w:val="{}"/>"#, alignment)?;
            }
            if let Some(level) = self.outline_level {
                write!(xml, r#"<w:outlineLvl w:val="{}"/>"#, level)?;
            }
            xml.push_str("</w:pPr>");
        }

        if self.has_run_properties() {
            xml.push_str("<w:rPr>");
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
            if self.caps {
                xml.push_str("<w:caps/>");
            }
            if let Some(ref color) = self.color {
                write!(xml, r#"<w:color w:val="{}"/>"#, escape_xml(color))?;
            }
            if let Some(size) = self.font_size {
                write!(xml, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#)?;
            }
            if self.underline {
                xml.push_str(r#"<w:u w:val="single"/>"#);
            }
            xml.push_str("</w:rPr>");
        }

        xml.push_str("</w:style>");
        Ok(())
    }

    /// Justified 14 pt body text, 1.5 lines, 12.5 mm paragraph indent, 8 pt after.
    pub fn normal() -> Self {
        let mut style = Self::new("Normal", "Normal", StyleType::Paragraph);
        style
            .set_default(true)
            .set_quick_style(true)
            .set_alignment("both")
            .set_spacing(Some(0), Some(160))
            .set_line_spacing(360)
            .set_indent(None, Some(12.5));
        style
    }

    /// Centered bold caps, used for structural headings like "ВВЕДЕНИЕ".
    pub fn title() -> Self {
        let mut style = Self::new("Title", "Title", StyleType::Paragraph);
        style
            .set_based_on("Normal")
            .set_next("Normal")
            .set_priority(10)
            .set_quick_style(true)
            .set_keep_next(true)
            .set_outline_level(0)
            .set_alignment("center")
            .set_spacing(None, Some(240))
            .set_indent(None, Some(0.0))
            .set_bold(true)
            .set_caps(true);
        style
    }

    /// `HeadingN` for levels 1 to 6.
    pub fn heading(level: u8) -> Self {
        let level = level.clamp(1, 6);
        let mut style = Self::new(
            format!("Heading{level}"),
            format!("heading {level}"),
            StyleType::Paragraph,
        );
        style
            .set_based_on("Normal")
            .set_next("Normal")
            .set_priority(9)
            .set_quick_style(true)
            .set_keep_next(true)
            .set_outline_level(level - 1)
            .set_alignment("left")
            .set_spacing(Some(240), Some(240))
            .set_bold(true);
        if level == 1 {
            style.set_font_size(16.0);
        }
        style
    }

    pub fn list_paragraph() -> Self {
        let mut style = Self::new("ListParagraph", "List Paragraph", StyleType::Paragraph);
        style
            .set_based_on("Normal")
            .set_priority(34)
            .set_quick_style(true)
            .set_indent(None, Some(0.0));
        style
    }

    /// Caption above a code listing.
    pub fn code_title() -> Self {
        let mut style = Self::new("CodeTitle", "Code Title", StyleType::Paragraph);
        style
            .set_based_on("Normal")
            .set_next("Code")
            .set_keep_next(true)
            .set_alignment("left")
            .set_spacing(Some(120), Some(0))
            .set_indent(None, Some(0.0));
        style
    }

    pub fn code() -> Self {
        let mut style = Self::new("Code", "Code", StyleType::Paragraph);
        style
            .set_based_on("Normal")
            .set_alignment("left")
            .set_spacing(Some(0), Some(0))
            .set_line_spacing(240)
            .set_indent(None, Some(0.0))
            .set_font_name(CODE_FONT)
            .set_font_size(10.0);
        style
    }

    pub fn default_paragraph_font() -> Self {
        let mut style = Self::new(
            "DefaultParagraphFont",
            "Default Paragraph Font",
            StyleType::Character,
        );
        style.set_default(true).set_priority(1);
        style
    }

    pub fn hyperlink() -> Self {
        let mut style = Self::new("Hyperlink", "Hyperlink", StyleType::Character);
        style
            .set_based_on("DefaultParagraphFont")
            .set_priority(99)
            .set_color("0563C1")
            .set_underline(true);
        style
    }

    pub fn footer() -> Self {
        let mut style = Self::new("Footer", "footer", StyleType::Paragraph);
        style.set_based_on("Normal").set_priority(99);
        style
    }
}

/// Styles referenced by the serializer.
pub fn report_styles() -> Vec<MutableStyle> {
    let mut styles = vec![
        MutableStyle::normal(),
        MutableStyle::default_paragraph_font(),
        MutableStyle::title(),
    ];
    styles.extend((1..=6).map(MutableStyle::heading));
    styles.extend([
        MutableStyle::list_paragraph(),
        MutableStyle::code_title(),
        MutableStyle::code(),
        MutableStyle::hyperlink(),
        MutableStyle::footer(),
    ]);
    styles
}

/// Generate a complete styles.xml document from a list of styles.
pub fn generate_styles_xml(styles: &[MutableStyle]) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );

    xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
    write!(
        xml,
        r#"<w:rFonts w:ascii="{BODY_FONT}" w:eastAsia="{BODY_FONT}" w:hAnsi="{BODY_FONT}" w:cs="{BODY_FONT}"/>"#
    )?;
    let size = pt_to_half_points(14.0);
    write!(xml, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#)?;
    write!(
        xml,
        r#"<w:lang w:val="{DEFAULT_LANG}" w:eastAsia="en-US" w:bidi="ar-SA"/>"#
    )?;
    xml.push_str("</w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>");

    for style in styles {
        style.to_xml(&mut xml)?;
    }

    xml.push_str("</w:styles>");
    Ok(xml)
}
