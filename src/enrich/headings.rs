//! Rewrites triggered by the conventional report headings.
use log::{debug, warn};
use phf::phf_map;

use crate::common::text::trim_end_chars;
use crate::common::{Diagnostic, DiagnosticKind};
use crate::document::{List, ListEntry, Node, Table, Text};

/// Placeholder statistics line of the abstract.
pub const ABSTRACT_STATISTICS: &str = "Отчет x с., x рис., x табл., x лист., x источн.";
/// Sentence introducing the glossary table.
pub const GLOSSARY_LEAD_IN: &str =
    "В настоящем отчете применяются следующие термины с соответствующими определениями.";
/// Sentence introducing the abbreviation lines.
pub const ABBREVIATIONS_LEAD_IN: &str =
    "В настоящем отчете применяют следующие сокращения и обозначения.";
pub const GLOSSARY_TERM: &str = "Термин";
pub const GLOSSARY_DEFINITION: &str = "Определение";

/// A conventional section of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Cover,
    Abstract,
    Contents,
    Glossary,
    Abbreviations,
    Introduction,
    Conclusion,
    References,
}

static HEADINGS: phf::Map<&'static str, Heading> = phf_map! {
    "ТИТУЛЬНИК" => Heading::Cover,
    "РЕФЕРАТ" => Heading::Abstract,
    "ОГЛАВЛЕНИЕ" => Heading::Contents,
    "ТЕРМИНЫ И ОПРЕДЕЛЕНИЯ" => Heading::Glossary,
    "ПЕРЕЧЕНЬ СОКРАЩЕНИЙ И ОБОЗНАЧЕНИЙ" => Heading::Abbreviations,
    "ВВЕДЕНИЕ" => Heading::Introduction,
    "ЗАКЛЮЧЕНИЕ" => Heading::Conclusion,
    "СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ" => Heading::References,
};

impl Heading {
    /// Case-insensitive exact lookup of a heading text.
    pub fn recognize(text: &str) -> Option<Self> {
        HEADINGS.get(text.trim().to_uppercase().as_str()).copied()
    }
}

/// Scan `nodes` once, rewriting around every recognized heading.
pub fn apply(nodes: &mut Vec<Node>, diagnostics: &mut Vec<Diagnostic>) {
    let mut i = 0;
    while i < nodes.len() {
        let heading = match &nodes[i] {
            Node::Title(title) => Heading::recognize(&title.text),
            _ => None,
        };
        i = match heading {
            Some(heading) => {
                debug!("enriching {heading:?} heading at node {i}");
                rewrite(heading, nodes, i, diagnostics)
            },
            None => i + 1,
        };
    }
}

/// Apply one rule to the heading at `i`; returns the index to resume from.
fn rewrite(heading: Heading, nodes: &mut Vec<Node>, i: usize, diagnostics: &mut Vec<Diagnostic>) -> usize {
    match heading {
        Heading::Cover => {
            let text = match &nodes[i] {
                Node::Title(title) => title.text.to_uppercase(),
                _ => return i + 1,
            };
            nodes[i] = Node::text(text);
            nodes.insert(i + 1, Node::PageBreak);
            i + 2
        },
        Heading::Abstract => {
            if let Node::Title(title) = &mut nodes[i] {
                title.level = 0;
                title.text = title.text.to_uppercase();
            }
            if let Some(Node::Text(keywords)) = nodes.get_mut(i + 1) {
                keywords.no_indent = true;
                keywords.text = trim_end_chars(&keywords.text, &['.']).to_uppercase();
            }
            nodes.insert(i + 1, Node::text(ABSTRACT_STATISTICS));
            let end = next_title(nodes, i + 2).unwrap_or(nodes.len());
            nodes.insert(end, Node::PageBreak);
            end + 1
        },
        Heading::Contents => {
            if let Node::Title(title) = &mut nodes[i] {
                title.level = 0;
            }
            nodes.insert(i + 1, Node::TableOfContents);
            i + 2
        },
        Heading::Glossary => {
            emphasize(&mut nodes[i]);
            let Some(Node::List(list)) = nodes.get(i + 1) else {
                shape_warning(diagnostics, DiagnosticKind::GlossaryShape, "ТЕРМИНЫ И ОПРЕДЕЛЕНИЯ", "no list follows the heading");
                return i + 1;
            };
            let rows = glossary_rows(list, diagnostics);
            nodes[i + 1] = Node::text(GLOSSARY_LEAD_IN);
            nodes.insert(
                i + 2,
                Node::Table(Table {
                    caption: None,
                    rows,
                    normal_font_size: true,
                }),
            );
            nodes.insert(i + 3, Node::PageBreak);
            i + 4
        },
        Heading::Abbreviations => {
            emphasize(&mut nodes[i]);
            let Some(Node::List(list)) = nodes.get(i + 1) else {
                shape_warning(
                    diagnostics,
                    DiagnosticKind::AbbreviationsShape,
                    "ПЕРЕЧЕНЬ СОКРАЩЕНИЙ И ОБОЗНАЧЕНИЙ",
                    "no list follows the heading",
                );
                return i + 1;
            };
            let lines = abbreviation_lines(list, diagnostics);
            let count = lines.len();
            nodes[i + 1] = Node::text(ABBREVIATIONS_LEAD_IN);
            let tail = nodes.split_off(i + 2);
            nodes.extend(lines);
            nodes.push(Node::PageBreak);
            nodes.extend(tail);
            i + 3 + count
        },
        Heading::Introduction => {
            emphasize(&mut nodes[i]);
            if let Some(next) = next_title(nodes, i + 1) {
                nodes.insert(next, Node::PageBreak);
            }
            i + 1
        },
        Heading::Conclusion => {
            emphasize(&mut nodes[i]);
            nodes.insert(i, Node::PageBreak);
            i + 2
        },
        Heading::References => {
            emphasize(&mut nodes[i]);
            nodes.insert(i, Node::PageBreak);
            match nodes.get_mut(i + 2) {
                Some(Node::List(list)) => {
                    list.alternate_style = true;
                    i + 3
                },
                _ => {
                    shape_warning(
                        diagnostics,
                        DiagnosticKind::ReferencesShape,
                        "СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ",
                        "no list follows the heading",
                    );
                    i + 2
                },
            }
        },
    }
}

/// Center and upper-case a heading.
fn emphasize(node: &mut Node) {
    if let Node::Title(title) = node {
        title.center = true;
        title.text = title.text.to_uppercase();
    }
}

fn next_title(nodes: &[Node], from: usize) -> Option<usize> {
    (from..nodes.len()).find(|&j| matches!(nodes[j], Node::Title(_)))
}

fn shape_warning(diagnostics: &mut Vec<Diagnostic>, kind: DiagnosticKind, heading: &str, detail: &str) {
    let message = format!("wrong format of {heading}: {detail}");
    warn!("{message}");
    diagnostics.push(Diagnostic::new(kind, message));
}

/// Header row plus one `term: definition` row per well-formed item.
fn glossary_rows(list: &List, diagnostics: &mut Vec<Diagnostic>) -> Vec<Vec<Node>> {
    let mut rows = vec![Node::table_row(&[GLOSSARY_TERM, GLOSSARY_DEFINITION])];
    for entry in &list.items {
        match entry {
            ListEntry::Item(item) => match item.text.split_once(':') {
                Some((term, definition)) => rows.push(Node::table_row(&[term.trim(), definition.trim()])),
                None => shape_warning(
                    diagnostics,
                    DiagnosticKind::GlossaryShape,
                    "ТЕРМИНЫ И ОПРЕДЕЛЕНИЯ",
                    &format!("item without a colon: \"{}\"", item.text),
                ),
            },
            ListEntry::List(_) => shape_warning(
                diagnostics,
                DiagnosticKind::GlossaryShape,
                "ТЕРМИНЫ И ОПРЕДЕЛЕНИЯ",
                "nested list skipped",
            ),
        }
    }
    rows
}

fn abbreviation_lines(list: &List, diagnostics: &mut Vec<Diagnostic>) -> Vec<Node> {
    let mut lines = Vec::with_capacity(list.items.len());
    for entry in &list.items {
        match entry {
            ListEntry::Item(item) => lines.push(Node::Text(Text {
                text: trim_end_chars(&item.text, &['.']).to_string(),
                no_indent: true,
                no_margin: true,
            })),
            ListEntry::List(_) => shape_warning(
                diagnostics,
                DiagnosticKind::AbbreviationsShape,
                "ПЕРЕЧЕНЬ СОКРАЩЕНИЙ И ОБОЗНАЧЕНИЙ",
                "nested list skipped",
            ),
        }
    }
    lines
}
