//! Document tree: sections and the closed set of node variants.
//!
//! Every text-bearing field is generic over `T` so the same shapes serve both
//! the raw tree produced by the parser (`T = String`) and the resolved tree
//! consumed by the serializer (`T = Vec<Rune>`).
use std::collections::BTreeMap;

use super::rune::Rune;

/// Resolved text: an ordered sequence of styled atoms.
pub type Runes = Vec<Rune>;

/// Flags set by `!!rule` directives anywhere in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Color code blocks with the lexical tokenizer
    pub highlight_code: bool,
    /// Cycle text color per character
    pub rainbow: bool,
    /// Document title metadata
    pub title: Option<String>,
    /// Document author metadata
    pub author: Option<String>,
}

/// A parsed document: ordered sections plus global settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<T = String> {
    pub sections: Vec<Section<T>>,
    pub settings: Settings,
}

/// A page-numbering-independent slice of the node sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<T = String> {
    /// First page number, `None` continues numbering from the previous section
    pub page_start: Option<u32>,
    pub nodes: Vec<Node<T>>,
}

/// One typed element of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<T = String> {
    Text(Text<T>),
    Title(Title<T>),
    PageBreak,
    TableOfContents,
    Table(Table<T>),
    List(List<T>),
    Image(Image<T>),
    Code(Code<T>),
    ExternalDoc(ExternalDoc),
    SectionBreak(SectionBreak),
}

/// Body paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Text<T = String> {
    pub text: T,
    /// Suppress the first-line indent
    pub no_indent: bool,
    /// Suppress spacing after the paragraph
    pub no_margin: bool,
}

/// Heading of level 0 (document title) to 6.
#[derive(Debug, Clone, PartialEq)]
pub struct Title<T = String> {
    pub text: T,
    pub level: u8,
    pub center: bool,
}

/// Grid of cells; each cell holds one node of any kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T = String> {
    pub caption: Option<T>,
    pub rows: Vec<Vec<Node<T>>>,
    /// Keep the body font size instead of the reduced table size
    pub normal_font_size: bool,
}

/// Ordered or bulleted list; entries may nest further lists.
#[derive(Debug, Clone, PartialEq)]
pub struct List<T = String> {
    pub ordered: bool,
    pub start_index: u32,
    pub items: Vec<ListEntry<T>>,
    /// `N.` labels without hanging indent (bibliography lists)
    pub alternate_style: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry<T = String> {
    Item(ListItem<T>),
    List(List<T>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem<T = String> {
    pub text: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image<T = String> {
    /// Alt text, rendered as the caption
    pub alt: T,
    pub src: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Code<T = String> {
    pub lang: String,
    pub title: T,
    pub body: String,
}

/// Reference to another Word document expanded by the finishing stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDoc {
    pub path: String,
    pub dict: BTreeMap<String, String>,
}

/// One-shot directive that starts a new section when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBreak {
    pub page_start: Option<u32>,
}

impl Document<String> {
    /// Create an empty document with one section starting at page 1.
    pub fn new() -> Self {
        Self {
            sections: vec![Section {
                page_start: Some(1),
                nodes: Vec::new(),
            }],
            settings: Settings::default(),
        }
    }
}

impl Default for Document<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Document<T> {
    /// Append a node to the last section.
    pub fn push(&mut self, node: Node<T>) {
        if let Some(section) = self.sections.last_mut() {
            section.nodes.push(node);
        } else {
            self.sections.push(Section {
                page_start: Some(1),
                nodes: vec![node],
            });
        }
    }

    /// Rewrite every text field, keeping the tree shape.
    pub fn map_text<U>(self, f: &mut impl FnMut(T) -> U) -> Document<U> {
        Document {
            sections: self
                .sections
                .into_iter()
                .map(|section| Section {
                    page_start: section.page_start,
                    nodes: section
                        .nodes
                        .into_iter()
                        .map(|n| n.map_text(&mut *f))
                        .collect(),
                })
                .collect(),
            settings: self.settings,
        }
    }

    /// Whether any section (or table cell) holds a code block.
    pub fn has_code(&self) -> bool {
        fn any_code<T>(nodes: &[Node<T>]) -> bool {
            nodes.iter().any(|node| match node {
                Node::Code(_) => true,
                Node::Table(table) => table.rows.iter().any(|row| any_code(row)),
                _ => false,
            })
        }
        self.sections.iter().any(|s| any_code(&s.nodes))
    }
}

impl<T> Node<T> {
    /// Rewrite every text field of this node and its children.
    pub fn map_text<U>(self, f: &mut impl FnMut(T) -> U) -> Node<U> {
        match self {
            Node::Text(t) => Node::Text(Text {
                text: f(t.text),
                no_indent: t.no_indent,
                no_margin: t.no_margin,
            }),
            Node::Title(t) => Node::Title(Title {
                text: f(t.text),
                level: t.level,
                center: t.center,
            }),
            Node::PageBreak => Node::PageBreak,
            Node::TableOfContents => Node::TableOfContents,
            Node::Table(t) => Node::Table(Table {
                caption: t.caption.map(&mut *f),
                rows: t
                    .rows
                    .into_iter()
                    .map(|row| row.into_iter().map(|cell| cell.map_text(&mut *f)).collect())
                    .collect(),
                normal_font_size: t.normal_font_size,
            }),
            Node::List(list) => Node::List(list.map_text(f)),
            Node::Image(img) => Node::Image(Image {
                alt: f(img.alt),
                src: img.src,
                width: img.width,
                height: img.height,
            }),
            Node::Code(code) => Node::Code(Code {
                lang: code.lang,
                title: f(code.title),
                body: code.body,
            }),
            Node::ExternalDoc(doc) => Node::ExternalDoc(doc),
            Node::SectionBreak(brk) => Node::SectionBreak(brk),
        }
    }
}

impl<T> List<T> {
    pub fn map_text<U>(self, f: &mut impl FnMut(T) -> U) -> List<U> {
        List {
            ordered: self.ordered,
            start_index: self.start_index,
            items: self
                .items
                .into_iter()
                .map(|entry| match entry {
                    ListEntry::Item(item) => ListEntry::Item(ListItem { text: f(item.text) }),
                    ListEntry::List(list) => ListEntry::List(list.map_text(&mut *f)),
                })
                .collect(),
            alternate_style: self.alternate_style,
        }
    }
}

impl Node<String> {
    /// Plain body paragraph.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Text {
            text: text.into(),
            no_indent: false,
            no_margin: false,
        })
    }

    /// Heading of the given level.
    pub fn title(text: impl Into<String>, level: u8) -> Self {
        Node::Title(Title {
            text: text.into(),
            level,
            center: false,
        })
    }

    /// One table row of plain text cells.
    pub fn table_row<S: AsRef<str>>(cells: &[S]) -> Vec<Self> {
        cells.iter().map(|c| Node::text(c.as_ref())).collect()
    }
}

impl List<String> {
    /// Single-item list, the shape the parser starts from.
    pub fn with_item(ordered: bool, start_index: u32, text: impl Into<String>) -> Self {
        Self {
            ordered,
            start_index,
            items: vec![ListEntry::Item(ListItem { text: text.into() })],
            alternate_style: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_one_section() {
        let doc = Document::new();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].page_start, Some(1));
        assert!(doc.sections[0].nodes.is_empty());
    }

    #[test]
    fn test_map_text_reaches_nested_fields() {
        let mut doc = Document::new();
        let mut list = List::with_item(false, 1, "a");
        list.items.push(ListEntry::List(List::with_item(true, 3, "b")));
        doc.push(Node::List(list));
        doc.push(Node::Table(Table {
            caption: Some("cap".to_string()),
            rows: vec![Node::table_row(&["x", "y"])],
            normal_font_size: false,
        }));

        let mapped = doc.map_text(&mut |s: String| s.len());
        let Node::List(list) = &mapped.sections[0].nodes[0] else {
            panic!("expected list");
        };
        let ListEntry::List(inner) = &list.items[1] else {
            panic!("expected nested list");
        };
        assert_eq!(inner.start_index, 3);
        assert_eq!(inner.items, vec![ListEntry::Item(ListItem { text: 1 })]);
        let Node::Table(table) = &mapped.sections[0].nodes[1] else {
            panic!("expected table");
        };
        assert_eq!(table.caption, Some(3));
    }

    #[test]
    fn test_has_code_looks_into_tables() {
        let mut doc = Document::new();
        assert!(!doc.has_code());
        doc.push(Node::Table(Table {
            caption: None,
            rows: vec![vec![Node::Code(Code {
                lang: "rust".to_string(),
                title: String::new(),
                body: "fn main() {}".to_string(),
            })]],
            normal_font_size: false,
        }));
        assert!(doc.has_code());
    }
}
