/// Section (page setup) support for DOCX documents.
use crate::common::unit::mm_to_twip;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

/// Section properties including page setup and margins.
///
/// All lengths are in twips (twentieth of a point, 1440 = 1 inch).
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProperties {
    pub page_width: i32,
    pub page_height: i32,
    pub margin_top: i32,
    pub margin_bottom: i32,
    pub margin_left: i32,
    pub margin_right: i32,
    pub header_distance: i32,
    pub footer_distance: i32,
    /// First page number of the section; `None` continues the numbering.
    pub page_start: Option<u32>,
}

impl Default for SectionProperties {
    fn default() -> Self {
        Self::gost()
    }
}

impl SectionProperties {
    /// A4 portrait with report margins: 20 mm top and bottom, 30 mm left,
    /// 15 mm right.
    pub fn gost() -> Self {
        Self {
            page_width: mm_to_twip(210.0),
            page_height: mm_to_twip(297.0),
            margin_top: mm_to_twip(20.0),
            margin_bottom: mm_to_twip(20.0),
            margin_left: mm_to_twip(30.0),
            margin_right: mm_to_twip(15.0),
            header_distance: 708,
            footer_distance: 708,
            page_start: None,
        }
    }

    pub fn with_page_start(mut self, start: Option<u32>) -> Self {
        self.page_start = start;
        self
    }

    /// Width available to body content.
    pub fn text_width(&self) -> i32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub(crate) fn to_xml(&self, xml: &mut String, footer_id: Option<&str>) -> Result<()> {
        xml.push_str("<w:sectPr>");
        if let Some(id) = footer_id {
            write!(xml, r#"<w:footerReference w:type="default" r:id="{}"/>"#, id)?;
        }
        xml.push_str(r#"<w:type w:val="nextPage"/>"#);
        write!(
            xml,
            r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
            self.page_width, self.page_height
        )?;
        write!(
            xml,
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="0"/>"#,
            self.margin_top,
            self.margin_right,
            self.margin_bottom,
            self.margin_left,
            self.header_distance,
            self.footer_distance
        )?;
        if let Some(start) = self.page_start {
            write!(xml, r#"<w:pgNumType w:start="{}"/>"#, start)?;
        }
        xml.push_str("</w:sectPr>");
        Ok(())
    }
}
