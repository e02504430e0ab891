//! Serialization backend: resolved document tree to a Word package.
//!
//! The tree is first cut at its section breaks ([`sections`]), then every
//! node is rendered into body elements of the section it belongs to. Lists
//! share the document's numbering part ([`lists`]), images are read from the
//! working directory ([`images`]) and code blocks may be colored ([`code`]).
//!
//! # Example
//!
//! ```rust
//! use md2gost::document::Node;
//! use md2gost::inline::{HueCursor, resolve_document};
//! use md2gost::markup;
//! use md2gost::serialize::{SerializeOptions, serialize};
//!
//! # fn main() -> Result<(), md2gost::Error> {
//! let parsed = markup::parse("# Введение\nТекст отчета.")?;
//! let runic = resolve_document(parsed.document, &mut HueCursor::new());
//! let doc = serialize(&runic, &SerializeOptions::new("."))?;
//! assert_eq!(doc.sections().len(), 1);
//! assert!(doc.to_bytes()?.starts_with(b"PK"));
//! # Ok(())
//! # }
//! ```
pub mod code;
pub mod external;
pub mod images;
pub mod lists;
pub mod runs;
pub mod sections;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::common::{Error, Result};
use crate::document::{
    Code, ExternalDoc, Image, List, ListEntry, Node, Rune, RunicDocument, Runes, Settings, Table,
    Text, Title, plain_text,
};
use crate::ooxml::DocumentProperties;
use crate::ooxml::docx::writer::style::DEFAULT_LANG;
use crate::ooxml::docx::writer::{
    BodyElement, MutableCell, MutableDocument, MutableInlineImage, MutableParagraph, MutableRow,
    MutableRun, MutableTable, SectionProperties, TableOfContents,
};
use crate::ooxml::docx::{LineSpacing, ParagraphAlignment};

use code::code_lines;
use lists::{LevelStyle, register_level};
use runs::{Bookmarks, append_runes};

/// Total table width in twips (165 mm of text width).
pub const TABLE_WIDTH: u32 = 9354;
/// Table body font size in half-points.
const TABLE_FONT_SIZE: u32 = 24;
/// Spacing before a paragraph that follows a table, in points.
const AFTER_TABLE_SPACING: f64 = 8.0;
/// Content control name of the table of contents.
const TOC_ALIAS: &str = "Оглавление";

/// Options of one serialization run.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Directory that image and external document paths are relative to
    pub workdir: PathBuf,
    /// Editing time recorded in the extended properties
    pub edit_minutes: u64,
    /// Creation and modification time; `None` takes the current time
    pub timestamp: Option<DateTime<Utc>>,
}

impl SerializeOptions {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            edit_minutes: 0,
            timestamp: None,
        }
    }

    #[inline]
    pub fn with_edit_minutes(mut self, minutes: u64) -> Self {
        self.edit_minutes = minutes;
        self
    }

    #[inline]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Build the Word document for `document`.
pub fn serialize(document: &RunicDocument, options: &SerializeOptions) -> Result<MutableDocument> {
    Serializer::new(options, &document.settings).run(document)
}

/// Build the Word document and pack it into bytes.
pub fn serialize_to_bytes(document: &RunicDocument, options: &SerializeOptions) -> Result<Vec<u8>> {
    Ok(serialize(document, options)?.to_bytes()?)
}

struct Serializer<'a> {
    options: &'a SerializeOptions,
    settings: &'a Settings,
    doc: MutableDocument,
    bookmarks: Bookmarks,
}

impl<'a> Serializer<'a> {
    fn new(options: &'a SerializeOptions, settings: &'a Settings) -> Self {
        Self {
            options,
            settings,
            doc: MutableDocument::new(),
            bookmarks: Bookmarks::new(),
        }
    }

    fn run(mut self, document: &RunicDocument) -> Result<MutableDocument> {
        let split = sections::split_sections(document.sections.clone());
        debug!(
            "{} source sections serialize into {}",
            document.sections.len(),
            split.len()
        );

        for (i, section) in split.iter().enumerate() {
            let properties = SectionProperties::gost().with_page_start(section.page_start);
            let target = if i == 0 {
                let first = self.doc.first_section_mut();
                first.properties = properties;
                first
            } else {
                self.doc.add_section(properties)
            };
            if section.page_start.is_some() {
                target.add_footer_paragraph(page_number_footer());
            }

            let mut body = Vec::new();
            self.render_nodes(&section.nodes, &mut body)?;
            for element in body {
                self.doc.add_element(element);
            }
        }

        self.doc.set_update_fields(true);
        self.doc.set_properties(self.metadata());
        Ok(self.doc)
    }

    fn metadata(&self) -> DocumentProperties {
        let now = self.options.timestamp.unwrap_or_else(Utc::now);
        let mut properties = DocumentProperties::new()
            .language(DEFAULT_LANG)
            .timestamps(now)
            .edit_minutes(self.options.edit_minutes);
        if let Some(ref title) = self.settings.title {
            properties = properties.title(title);
        }
        if let Some(ref author) = self.settings.author {
            properties = properties.creator(author);
        }
        properties
    }

    fn render_nodes(&mut self, nodes: &[Node<Runes>], out: &mut Vec<BodyElement>) -> Result<()> {
        for node in nodes {
            self.render_node(node, out)?;
        }
        Ok(())
    }

    fn render_node(&mut self, node: &Node<Runes>, out: &mut Vec<BodyElement>) -> Result<()> {
        match node {
            Node::Text(text) => self.render_text(text, out),
            Node::Title(title) => self.render_title(title, out)?,
            Node::PageBreak => render_page_break(out),
            Node::TableOfContents => {
                out.push(BodyElement::TableOfContents(
                    TableOfContents::new().alias(TOC_ALIAS),
                ));
                let mut para = MutableParagraph::new();
                para.add_page_break();
                out.push(BodyElement::Paragraph(para));
            },
            Node::Table(table) => self.render_table(table, out)?,
            Node::List(list) => self.render_list(list, out),
            Node::Image(image) => self.render_image(image, out)?,
            Node::Code(code) => self.render_code(code, out),
            Node::ExternalDoc(doc) => self.render_external(doc, out)?,
            // Top-level breaks are consumed by the section split.
            Node::SectionBreak(_) => warn!("section break inside a table cell ignored"),
        }
        Ok(())
    }

    fn paragraph(&mut self, runes: &[Rune]) -> MutableParagraph {
        let mut para = MutableParagraph::new();
        append_runes(&mut para, runes, &mut self.bookmarks, None);
        para
    }

    fn render_text(&mut self, text: &Text<Runes>, out: &mut Vec<BodyElement>) {
        let mut para = self.paragraph(&text.text);
        if text.no_indent {
            para.set_indent_first_line(0.0);
        }
        if text.no_margin {
            para.set_space_after(0.0);
        }
        if matches!(out.last(), Some(BodyElement::Table(_))) {
            para.set_space_before(AFTER_TABLE_SPACING);
        }
        out.push(BodyElement::Paragraph(para));
    }

    fn render_title(&mut self, title: &Title<Runes>, out: &mut Vec<BodyElement>) -> Result<()> {
        if title.level > 6 {
            return Err(Error::InvalidHeadingLevel(title.level));
        }
        let mut para = self.paragraph(&title.text);
        if title.level == 0 {
            para.set_style("Title");
        } else {
            para.set_style(&format!("Heading{}", title.level));
        }
        if title.center {
            para.set_alignment(ParagraphAlignment::Center);
            para.set_indent_first_line(0.0);
        }
        out.push(BodyElement::Paragraph(para));
        Ok(())
    }

    fn render_table(&mut self, table: &Table<Runes>, out: &mut Vec<BodyElement>) -> Result<()> {
        if let Some(ref caption) = table.caption {
            let mut para = self.paragraph(caption);
            para.set_indent_first_line(0.0);
            para.set_line_spacing(LineSpacing::Single);
            para.set_keep_next(true);
            out.push(BodyElement::Paragraph(para));
        }

        let font_size = (!table.normal_font_size).then_some(TABLE_FONT_SIZE);
        let mut grid = MutableTable::new(TABLE_WIDTH);
        grid.set_header_rows(1);
        for (row_index, row) in table.rows.iter().enumerate() {
            let mut cells = MutableRow::new();
            for node in row {
                let mut cell = MutableCell::new();
                match node {
                    Node::Text(text) => {
                        let mut para = MutableParagraph::new();
                        append_runes(&mut para, &text.text, &mut self.bookmarks, font_size);
                        para.set_alignment(if row_index == 0 {
                            ParagraphAlignment::Center
                        } else {
                            ParagraphAlignment::Left
                        });
                        para.set_indent_first_line(0.0);
                        para.set_space_after(0.0);
                        para.set_line_spacing(LineSpacing::Multiple(1.25));
                        cell.add_paragraph(para);
                    },
                    other => {
                        let mut nested = Vec::new();
                        self.render_node(other, &mut nested)?;
                        for element in nested {
                            cell.add_element(element);
                        }
                    },
                }
                cells.add_cell(cell);
            }
            grid.add_row(cells);
        }
        out.push(BodyElement::Table(grid));
        Ok(())
    }

    fn render_list(&mut self, list: &List<Runes>, out: &mut Vec<BodyElement>) {
        let num_id = self.doc.numbering_mut().add_definition();
        debug!("list gets numbering definition {num_id}");
        self.render_list_level(list, 0, list.alternate_style, num_id, out);
    }

    fn render_list_level(
        &mut self,
        list: &List<Runes>,
        level: u32,
        alternate: bool,
        num_id: u32,
        out: &mut Vec<BodyElement>,
    ) {
        if let Some(definition) = self.doc.numbering_mut().definition_mut(num_id) {
            let style = LevelStyle {
                ordered: list.ordered,
                alternate,
                start: list.start_index,
            };
            register_level(definition, level, style);
        }
        for entry in &list.items {
            match entry {
                ListEntry::Item(item) => {
                    let mut para = MutableParagraph::with_style("ListParagraph");
                    append_runes(&mut para, &item.text, &mut self.bookmarks, None);
                    para.set_numbering(num_id, level);
                    out.push(BodyElement::Paragraph(para));
                },
                ListEntry::List(nested) => {
                    self.render_list_level(nested, level + 1, alternate, num_id, out);
                },
            }
        }
    }

    fn render_image(&mut self, image: &Image<Runes>, out: &mut Vec<BodyElement>) -> Result<()> {
        let loaded = images::load_image(&self.options.workdir, &image.src)?;
        let (width, height) = images::fit((loaded.width, loaded.height), image.width, image.height);
        debug!(
            "image {} placed at {}x{} px (intrinsic {}x{})",
            image.src, width, height, loaded.width, loaded.height
        );
        let alt = plain_text(&image.alt);

        let mut picture = MutableInlineImage::from_bytes(loaded.data, width, height)?;
        picture.set_description(alt.as_str());
        let mut para = MutableParagraph::new();
        para.add_picture(picture);
        para.set_alignment(ParagraphAlignment::Center);
        para.set_indent_first_line(0.0);
        para.set_keep_next(true);
        out.push(BodyElement::Paragraph(para));

        if !alt.trim().is_empty() {
            let mut caption = self.paragraph(&image.alt);
            caption.set_alignment(ParagraphAlignment::Center);
            caption.set_indent_first_line(0.0);
            caption.set_line_spacing(LineSpacing::Single);
            out.push(BodyElement::Paragraph(caption));
        }
        Ok(())
    }

    fn render_code(&mut self, code: &Code<Runes>, out: &mut Vec<BodyElement>) {
        let mut title = MutableParagraph::with_style("CodeTitle");
        append_runes(&mut title, &code.title, &mut self.bookmarks, None);
        out.push(BodyElement::Paragraph(title));

        for spans in code_lines(&code.lang, &code.body, self.settings.highlight_code) {
            let mut para = MutableParagraph::with_style("Code");
            for span in spans {
                let mut run = MutableRun::new(&span.text);
                if let Some(color) = span.color {
                    run.color(color);
                }
                run.bold(span.bold).italic(span.italic);
                para.add_run(run);
            }
            out.push(BodyElement::Paragraph(para));
        }
    }

    fn render_external(&mut self, doc: &ExternalDoc, out: &mut Vec<BodyElement>) -> Result<()> {
        let text = external::placeholder(&self.options.workdir, doc)?;
        let mut para = MutableParagraph::new();
        para.add_run_with_text(&text);
        para.set_indent_first_line(0.0);
        para.set_alignment(ParagraphAlignment::Left);
        out.push(BodyElement::Paragraph(para));
        Ok(())
    }
}

/// A page break joins the previous paragraph when there is one.
fn render_page_break(out: &mut Vec<BodyElement>) {
    if let Some(BodyElement::Paragraph(para)) = out.last_mut() {
        para.add_page_break();
        return;
    }
    let mut para = MutableParagraph::new();
    para.add_page_break();
    out.push(BodyElement::Paragraph(para));
}

/// Centered current-page field.
fn page_number_footer() -> MutableParagraph {
    let mut para = MutableParagraph::with_style("Footer");
    para.add_run(MutableRun::page_number());
    para.set_alignment(ParagraphAlignment::Center);
    para.set_indent_first_line(0.0);
    para.set_line_spacing(LineSpacing::Single);
    para
}
