/// Table support for DOCX documents.
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

use super::doc::BodyElement;
use super::paragraph::MutableParagraph;
use super::relmap::PartContext;

/// Width of the single black cell borders, in eighths of a point.
const BORDER_SIZE: u32 = 4;

/// A mutable table with a fixed total width split evenly among columns.
#[derive(Debug, Clone)]
pub struct MutableTable {
    pub(crate) rows: Vec<MutableRow>,
    pub(crate) width: u32,
    pub(crate) header_rows: usize,
}

impl MutableTable {
    /// Create an empty table `width` twips wide.
    pub fn new(width: u32) -> Self {
        Self {
            rows: Vec::new(),
            width,
            header_rows: 0,
        }
    }

    pub fn add_row(&mut self, row: MutableRow) -> &mut Self {
        self.rows.push(row);
        self
    }

    /// Mark the first `count` rows as repeating header rows.
    pub fn set_header_rows(&mut self, count: usize) {
        self.header_rows = count;
    }

    /// Widest row decides the grid.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&MutableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    fn column_width(&self) -> u32 {
        self.width / self.column_count().max(1) as u32
    }

    pub(crate) fn to_xml<'a>(&'a self, xml: &mut String, ctx: &mut PartContext<'a>) -> Result<()> {
        let columns = self.column_count();
        let col_width = self.column_width();

        xml.push_str("<w:tbl><w:tblPr>");
        write!(xml, r#"<w:tblW w:w="{}" w:type="dxa"/>"#, self.width)?;
        xml.push_str("<w:tblBorders>");
        for name in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            write!(
                xml,
                r#"<w:{name} w:val="single" w:sz="{BORDER_SIZE}" w:space="0" w:color="000000"/>"#
            )?;
        }
        xml.push_str(r#"</w:tblBorders><w:tblLayout w:type="fixed"/>"#);
        xml.push_str(r#"<w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/>"#);
        xml.push_str("</w:tblPr><w:tblGrid>");
        for _ in 0..columns {
            write!(xml, r#"<w:gridCol w:w="{}"/>"#, col_width)?;
        }
        xml.push_str("</w:tblGrid>");

        for (i, row) in self.rows.iter().enumerate() {
            row.to_xml(xml, ctx, col_width, i < self.header_rows)?;
        }

        xml.push_str("</w:tbl>");
        Ok(())
    }
}

/// A table row.
#[derive(Debug, Clone, Default)]
pub struct MutableRow {
    pub(crate) cells: Vec<MutableCell>,
}

impl MutableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cell(&mut self, cell: MutableCell) -> &mut Self {
        self.cells.push(cell);
        self
    }

    fn to_xml<'a>(
        &'a self,
        xml: &mut String,
        ctx: &mut PartContext<'a>,
        col_width: u32,
        header: bool,
    ) -> Result<()> {
        xml.push_str("<w:tr>");
        if header {
            xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
        }
        for cell in &self.cells {
            cell.to_xml(xml, ctx, col_width)?;
        }
        xml.push_str("</w:tr>");
        Ok(())
    }
}

/// A table cell holding block content, usually paragraphs.
#[derive(Debug, Clone, Default)]
pub struct MutableCell {
    pub(crate) elements: Vec<BodyElement>,
}

impl MutableCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(&mut self, para: MutableParagraph) -> &mut Self {
        self.elements.push(BodyElement::Paragraph(para));
        self
    }

    pub fn add_element(&mut self, element: BodyElement) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn elements(&self) -> &[BodyElement] {
        &self.elements
    }

    fn to_xml<'a>(&'a self, xml: &mut String, ctx: &mut PartContext<'a>, width: u32) -> Result<()> {
        write!(
            xml,
            r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>"#,
            width
        )?;
        for element in &self.elements {
            element.to_xml(xml, ctx)?;
        }
        // A cell must end with a paragraph.
        if !matches!(self.elements.last(), Some(BodyElement::Paragraph(_))) {
            xml.push_str("<w:p/>");
        }
        xml.push_str("</w:tc>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> MutableCell {
        let mut para = MutableParagraph::new();
        para.add_run_with_text(text);
        let mut cell = MutableCell::new();
        cell.add_paragraph(para);
        cell
    }

    fn table() -> MutableTable {
        let mut table = MutableTable::new(9354);
        let mut header = MutableRow::new();
        header.add_cell(cell("A")).add_cell(cell("B")).add_cell(cell("C"));
        let mut body = MutableRow::new();
        body.add_cell(cell("1")).add_cell(MutableCell::new());
        table.add_row(header).add_row(body);
        table.set_header_rows(1);
        table
    }

    fn render(table: &MutableTable) -> String {
        let mut ctx = PartContext::new();
        let mut xml = String::new();
        table.to_xml(&mut xml, &mut ctx).unwrap();
        xml
    }

    #[test]
    fn test_grid_is_even() {
        let xml = render(&table());
        assert_eq!(xml.matches(r#"<w:gridCol w:w="3118"/>"#).count(), 3);
        assert!(xml.contains(r#"<w:tblW w:w="9354" w:type="dxa"/>"#));
    }

    #[test]
    fn test_header_row_repeats() {
        let xml = render(&table());
        assert_eq!(xml.matches("<w:tblHeader/>").count(), 1);
        assert!(xml.find("<w:tblHeader/>").unwrap() < xml.find(">A<").unwrap());
    }

    #[test]
    fn test_empty_cell_gets_paragraph() {
        let xml = render(&table());
        assert!(xml.contains(r#"</w:tcPr><w:p/></w:tc>"#));
    }

    #[test]
    fn test_nested_table_cell_is_closed() {
        let mut outer = MutableTable::new(9354);
        let mut inner_cell = MutableCell::new();
        inner_cell.add_element(BodyElement::Table(table()));
        let mut row = MutableRow::new();
        row.add_cell(inner_cell);
        outer.add_row(row);
        let xml = render(&outer);
        assert!(xml.contains("</w:tbl><w:p/></w:tc>"));
    }

    #[test]
    fn test_borders() {
        let xml = render(&table());
        assert!(xml.contains(r#"<w:insideV w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#));
    }
}
