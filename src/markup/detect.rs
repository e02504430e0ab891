//! Post-passes over a section's nodes: empty text removal, external
//! document directives and pipe tables.
use std::collections::BTreeMap;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::common::{Diagnostic, DiagnosticKind};
use crate::document::{ExternalDoc, Node, Table};

static EXTERNAL_DOC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^!!\((.*)\)\s*\{(.*)\}$").expect("valid directive pattern"));
static TRAILING_COMMA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("valid comma pattern"));
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*:?-+:?\s*\|)+\s*:?-+:?\s*$").expect("valid separator pattern")
});
static EMPTY_ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|(\s*\|)*$").expect("valid empty row pattern"));

/// Drop text nodes left empty by blank lines.
pub fn remove_empty_text(nodes: &mut Vec<Node>) {
    nodes.retain(|node| !matches!(node, Node::Text(t) if t.text.is_empty()));
}

/// Replace `!!(path){dict}` text nodes with external document nodes.
///
/// An unparsable dictionary still yields the node, with an empty dictionary
/// and a [`DiagnosticKind::MalformedDictionary`] finding.
pub fn external_docs(nodes: &mut [Node], diagnostics: &mut Vec<Diagnostic>) {
    for node in nodes.iter_mut() {
        let Node::Text(text) = node else {
            continue;
        };
        if let Some(doc) = external_doc(&text.text, diagnostics) {
            *node = Node::ExternalDoc(doc);
        }
    }
}

fn external_doc(text: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<ExternalDoc> {
    let cleaned = TRAILING_COMMA_RE.replace_all(text, "$1");
    let caps = EXTERNAL_DOC_RE.captures(&cleaned)?;
    let body = &caps[2];
    let dict = match serde_json::from_str::<Map<String, Value>>(&format!("{{{body}}}")) {
        Ok(map) => map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect(),
        Err(e) => {
            let message = format!(
                "cannot parse document dictionary {{{}}}: {e}",
                body.replace('\n', " ")
            );
            warn!("{message}");
            diagnostics.push(Diagnostic::new(DiagnosticKind::MalformedDictionary, message));
            BTreeMap::new()
        },
    };
    Some(ExternalDoc {
        path: caps[1].to_string(),
        dict,
    })
}

/// Turn text nodes shaped like pipe tables into table nodes.
///
/// The text node right before a table becomes its caption. Lines after the
/// last well-formed row stay behind as a text node following the table.
pub fn tables(nodes: &mut Vec<Node>) {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        let Node::Text(text) = &node else {
            out.push(node);
            continue;
        };
        let Some((rows, rest)) = split_table(&text.text) else {
            out.push(node);
            continue;
        };
        let caption = match out.last() {
            Some(Node::Text(_)) => match out.pop() {
                Some(Node::Text(prev)) => Some(prev.text),
                _ => None,
            },
            _ => None,
        };
        out.push(Node::Table(Table {
            caption,
            rows,
            normal_font_size: false,
        }));
        if let Some(rest) = rest {
            out.push(Node::text(rest));
        }
    }
    *nodes = out;
}

/// Rows of a pipe table plus any lines left over after it.
fn split_table(text: &str) -> Option<(Vec<Vec<Node>>, Option<String>)> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 3 {
        return None;
    }
    let separator = trim_row(lines[1]);
    if !SEPARATOR_RE.is_match(separator) {
        return None;
    }
    let columns = separator.split('|').count();
    let header = cells(lines[0]);
    if header.len() != columns {
        return None;
    }

    let mut rows = vec![Node::table_row(&header)];
    let mut consumed = 2;
    for line in &lines[2..] {
        let row = cells(line);
        if row.len() != columns {
            break;
        }
        rows.push(Node::table_row(&row));
        consumed += 1;
    }
    if rows.len() < 2 {
        return None;
    }
    let rest = (consumed < lines.len()).then(|| lines[consumed..].join("\n"));
    Some((rows, rest))
}

fn cells(line: &str) -> Vec<&str> {
    trim_row(line).split('|').map(str::trim).collect()
}

/// Strip the outer pipes of a row; rows made only of pipes stay intact.
fn trim_row(line: &str) -> &str {
    let line = line.trim();
    if EMPTY_ROW_RE.is_match(line) {
        return line;
    }
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_empty_text() {
        let mut nodes = vec![Node::text(""), Node::title("T", 1), Node::text("")];
        remove_empty_text(&mut nodes);
        assert_eq!(nodes, vec![Node::title("T", 1)]);
    }

    #[test]
    fn test_external_doc_with_trailing_comma() {
        let mut nodes = vec![Node::text("!!(cover.docx){\"name\": \"Ivan\",\n\"year\": 2024,}")];
        let mut diagnostics = Vec::new();
        external_docs(&mut nodes, &mut diagnostics);
        assert!(diagnostics.is_empty());
        let Node::ExternalDoc(doc) = &nodes[0] else {
            panic!("expected external doc");
        };
        assert_eq!(doc.path, "cover.docx");
        assert_eq!(doc.dict.get("name").map(String::as_str), Some("Ivan"));
        assert_eq!(doc.dict.get("year").map(String::as_str), Some("2024"));
    }

    #[test]
    fn test_external_doc_bad_dictionary() {
        let mut nodes = vec![Node::text("!!(cover.docx){name: oops}")];
        let mut diagnostics = Vec::new();
        external_docs(&mut nodes, &mut diagnostics);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MalformedDictionary);
        assert!(matches!(&nodes[0], Node::ExternalDoc(d) if d.dict.is_empty()));
    }

    #[test]
    fn test_table_with_caption() {
        let mut nodes = vec![
            Node::text("Таблица 1 - Data"),
            Node::text("| a | b |\n|---|:-:|\n| 1 | 2 |\n| 3 | 4 |"),
        ];
        tables(&mut nodes);
        let [Node::Table(table)] = nodes.as_slice() else {
            panic!("expected a single table, got {nodes:?}");
        };
        assert_eq!(table.caption.as_deref(), Some("Таблица 1 - Data"));
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], Node::table_row(&["a", "b"]));
        assert_eq!(table.rows[2], Node::table_row(&["3", "4"]));
    }

    #[test]
    fn test_table_trailing_lines_kept() {
        let mut nodes = vec![Node::text("a | b\n--|--\n1 | 2\nnot a row")];
        tables(&mut nodes);
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], Node::Table(t) if t.caption.is_none() && t.rows.len() == 2));
        assert_eq!(nodes[1], Node::text("not a row"));
    }

    #[test]
    fn test_not_a_table() {
        let original = vec![
            Node::text("| a | b |\n|---|---|"),
            Node::text("| a | b |\n|---|---|---|\n| 1 | 2 |"),
            Node::text("| a | b |\n| x | y |\n| 1 | 2 |"),
            Node::text("| a | b |\n|---|---|\n| only one |"),
        ];
        let mut nodes = original.clone();
        tables(&mut nodes);
        assert_eq!(nodes, original);
    }
}
