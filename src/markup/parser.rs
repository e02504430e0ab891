//! Structural parser: markup source to a [`Document`] tree.
use std::path::Path;

use log::{debug, warn};

use super::detect;
use super::line::{Line, Marker, classify};
use crate::common::{Diagnostic, DiagnosticKind, Error, Result};
use crate::document::{Code, Document, Image, List, ListEntry, ListItem, Node, SectionBreak};

/// Parse result: the document plus non-fatal findings.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a markup source held in memory.
pub fn parse(source: &str) -> Result<Parsed> {
    Parser::new(source).run()
}

/// Read and parse a markup file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Parsed> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    let source = std::fs::read_to_string(path)?;
    parse(&source)
}

/// Line cursor over the source plus the document under construction.
struct Parser<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
    document: Document,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        let lines = source
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        Self {
            lines,
            cursor: 0,
            document: Document::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Parsed> {
        while self.cursor < self.lines.len() {
            let raw = self.lines[self.cursor];
            let line = self.classify_at(self.cursor)?;
            self.cursor += 1;
            match line.marker {
                Marker::Heading(level) => self.document.push(Node::title(line.text, level)),
                Marker::Bullet => {
                    let list = self.parse_list(line.text, false, 1, 0)?;
                    self.document.push(Node::List(list));
                },
                Marker::Ordered(start) => {
                    let list = self.parse_list(line.text, true, start, 0)?;
                    self.document.push(Node::List(list));
                },
                Marker::Image {
                    alt,
                    src,
                    width,
                    height,
                } => self.document.push(Node::Image(Image {
                    alt,
                    src,
                    width,
                    height,
                })),
                Marker::CodeFence => {
                    let code = self.parse_code(&line.text);
                    self.document.push(Node::Code(code));
                },
                Marker::Comment => {},
                Marker::SectionBreak(page_start) => {
                    self.document
                        .push(Node::SectionBreak(SectionBreak { page_start }));
                },
                Marker::Rule => self.apply_rule(&line.text),
                Marker::Plain | Marker::Indent => self.push_text(raw),
            }
        }

        let mut document = self.document;
        let mut diagnostics = self.diagnostics;
        for section in &mut document.sections {
            detect::remove_empty_text(&mut section.nodes);
            detect::external_docs(&mut section.nodes, &mut diagnostics);
            detect::tables(&mut section.nodes);
        }
        debug!(
            "parsed {} nodes, {} diagnostics",
            document.sections.iter().map(|s| s.nodes.len()).sum::<usize>(),
            diagnostics.len()
        );
        Ok(Parsed {
            document,
            diagnostics,
        })
    }

    fn classify_at(&self, index: usize) -> Result<Line> {
        classify(self.lines[index]).map_err(|e| Error::Parse {
            line: index + 1,
            message: e.to_string(),
        })
    }

    fn reclassify(&self, line: &Line) -> Result<Line> {
        line.reclassify().map_err(|e| Error::Parse {
            line: self.cursor + 1,
            message: e.to_string(),
        })
    }

    /// Plain lines join the preceding text node; blank lines open a new one.
    fn push_text(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if !trimmed.is_empty()
            && let Some(Node::Text(last)) = self
                .document
                .sections
                .last_mut()
                .and_then(|s| s.nodes.last_mut())
        {
            if !last.text.is_empty() {
                last.text.push('\n');
            }
            last.text.push_str(trimmed);
            return;
        }
        self.document.push(Node::text(trimmed));
    }

    /// Collect the items of a list whose first item has already been consumed.
    fn parse_list(&mut self, text: String, ordered: bool, start: u32, depth: usize) -> Result<List> {
        let mut list = List::with_item(ordered, start, text);
        while self.cursor < self.lines.len() {
            if self.list_ends()? {
                break;
            }
            let line = self.classify_at(self.cursor)?;
            let last_is_item = matches!(list.items.last(), Some(ListEntry::Item(_)));

            if line.depth == depth {
                let line = if line.marker == Marker::Indent {
                    self.reclassify(&line)?
                } else {
                    line
                };
                if line.marker == Marker::Plain && last_is_item {
                    append_to_last(&mut list, &line.text);
                } else if line.marker.continues_list(ordered) {
                    list.items.push(ListEntry::Item(ListItem { text: line.text }));
                } else {
                    break;
                }
            } else if line.depth > depth {
                let line = if line.depth == depth + 1 {
                    self.reclassify(&line)?
                } else {
                    line
                };
                match line.marker {
                    Marker::Plain | Marker::Indent if last_is_item => {
                        append_to_last(&mut list, &line.text);
                    },
                    Marker::Bullet => {
                        self.cursor += 1;
                        let nested = self.parse_list(line.text, false, 1, depth + 1)?;
                        list.items.push(ListEntry::List(nested));
                        continue;
                    },
                    Marker::Ordered(start) => {
                        self.cursor += 1;
                        let nested = self.parse_list(line.text, true, start, depth + 1)?;
                        list.items.push(ListEntry::List(nested));
                        continue;
                    },
                    _ => break,
                }
            } else {
                break;
            }
            self.cursor += 1;
        }
        Ok(list)
    }

    /// Skip blank lines between items; `true` when the list is over.
    ///
    /// A plain line continues the list only if no blank line precedes it; a
    /// marker line continues it regardless. The line that ends the list is
    /// left unconsumed.
    fn list_ends(&mut self) -> Result<bool> {
        let mut blank_found = false;
        for index in self.cursor..self.lines.len() {
            let mut line = self.classify_at(index)?;
            if line.marker == Marker::Indent {
                line = line.reclassify().map_err(|e| Error::Parse {
                    line: index + 1,
                    message: e.to_string(),
                })?;
            }
            if line.is_blank() {
                blank_found = true;
                continue;
            }
            if (line.marker == Marker::Plain && !blank_found) || line.marker.is_list_marker() {
                self.cursor = index;
                return Ok(false);
            }
            return Ok(true);
        }
        Ok(true)
    }

    /// Body up to the closing fence (consumed) or the end of input.
    fn parse_code(&mut self, header: &str) -> Code {
        let mut parts = header.split(' ');
        let lang = parts.next().unwrap_or("").to_string();
        let title = parts.collect::<Vec<_>>().join(" ");
        let mut body = String::new();
        while self.cursor < self.lines.len() {
            let raw = self.lines[self.cursor];
            self.cursor += 1;
            if raw.starts_with("```") {
                break;
            }
            body.push('\n');
            body.push_str(raw);
        }
        Code {
            lang,
            title,
            body: body.trim_start_matches('\n').trim_end().to_string(),
        }
    }

    fn apply_rule(&mut self, text: &str) {
        let text = text.trim();
        let lower = text.to_lowercase();
        let settings = &mut self.document.settings;
        if lower == "highlight code" {
            settings.highlight_code = true;
        } else if lower == "rainbow" {
            settings.rainbow = true;
        } else if let Some(rest) = strip_keyword(text, &lower, "title") {
            settings.title = Some(rest);
        } else if let Some(rest) = strip_keyword(text, &lower, "author") {
            settings.author = Some(rest);
        } else {
            warn!("unknown rule: \"{text}\"");
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnknownRule,
                format!("unknown rule: \"{text}\""),
            ));
        }
    }
}

fn strip_keyword(text: &str, lower: &str, keyword: &str) -> Option<String> {
    lower
        .starts_with(keyword)
        .then(|| text[keyword.len()..].trim().to_string())
}

fn append_to_last(list: &mut List, text: &str) {
    if let Some(ListEntry::Item(item)) = list.items.last_mut() {
        item.text.push('\n');
        item.text.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(source: &str) -> Vec<Node> {
        parse(source).unwrap().document.sections.remove(0).nodes
    }

    fn item_texts(list: &List) -> Vec<String> {
        list.items
            .iter()
            .filter_map(|e| match e {
                ListEntry::Item(i) => Some(i.text.clone()),
                ListEntry::List(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let nodes = nodes("first line\nsecond line\n\nnext paragraph\n");
        assert_eq!(
            nodes,
            vec![
                Node::text("first line\nsecond line"),
                Node::text("next paragraph")
            ]
        );
    }

    #[test]
    fn test_headings_and_comments() {
        let nodes = nodes("# Intro\n<!-- hidden -->\n### Deep  title");
        assert_eq!(nodes, vec![Node::title("Intro", 1), Node::title("Deep title", 3)]);
    }

    #[test]
    fn test_heading_too_deep_is_fatal() {
        let err = parse("text\n####### seven").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, ref message } if message.contains("level 7")));
    }

    #[test]
    fn test_list_with_continuation_and_nesting() {
        let source = "* one\n  tail\n* two\n    1. inner\n    2. inner two\n* three";
        let nodes = nodes(source);
        let [Node::List(list)] = nodes.as_slice() else {
            panic!("expected one list, got {nodes:?}");
        };
        assert!(!list.ordered);
        assert_eq!(item_texts(list), vec!["one\ntail", "two", "three"]);
        let ListEntry::List(inner) = &list.items[2] else {
            panic!("expected nested list");
        };
        assert!(inner.ordered);
        assert_eq!(inner.start_index, 1);
        assert_eq!(item_texts(inner), vec!["inner", "inner two"]);
    }

    #[test]
    fn test_ordered_start_index() {
        let nodes = nodes("3) c\n4) d");
        let [Node::List(list)] = nodes.as_slice() else {
            panic!("expected list");
        };
        assert_eq!(list.start_index, 3);
        assert_eq!(item_texts(list), vec!["c", "d"]);
    }

    #[test]
    fn test_blank_line_then_marker_continues_list() {
        let nodes = nodes("* a\n\n* b");
        let [Node::List(list)] = nodes.as_slice() else {
            panic!("expected list");
        };
        assert_eq!(item_texts(list), vec!["a", "b"]);
    }

    #[test]
    fn test_two_blank_lines_then_marker_continue_list() {
        let nodes = nodes("* a\n\n\n* b");
        let [Node::List(list)] = nodes.as_slice() else {
            panic!("expected list");
        };
        assert_eq!(item_texts(list), vec!["a", "b"]);
    }

    #[test]
    fn test_blank_line_then_plain_ends_list() {
        let nodes = nodes("* a\n\nafter");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], Node::List(l) if item_texts(l) == vec!["a"]));
        assert_eq!(nodes[1], Node::text("after"));
    }

    #[test]
    fn test_other_list_kind_ends_list() {
        let nodes = nodes("* a\n1. b");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], Node::List(l) if !l.ordered));
        assert!(matches!(&nodes[1], Node::List(l) if l.ordered));
    }

    #[test]
    fn test_code_block() {
        let nodes = nodes("```rust Main function\nfn main() {\n    run();\n}\n```\nafter");
        assert_eq!(
            nodes[0],
            Node::Code(Code {
                lang: "rust".to_string(),
                title: "Main function".to_string(),
                body: "fn main() {\n    run();\n}".to_string(),
            })
        );
        assert_eq!(nodes[1], Node::text("after"));
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let nodes = nodes("```py\nprint(1)\n# not a heading");
        let [Node::Code(code)] = nodes.as_slice() else {
            panic!("expected code");
        };
        assert_eq!(code.body, "print(1)\n# not a heading");
    }

    #[test]
    fn test_rules() {
        let parsed =
            parse("!!rule highlight code\n!!rule Rainbow\n!!rule title My report\n!!rule author A. B.\n!!rule bogus")
                .unwrap();
        let settings = &parsed.document.settings;
        assert!(settings.highlight_code);
        assert!(settings.rainbow);
        assert_eq!(settings.title.as_deref(), Some("My report"));
        assert_eq!(settings.author.as_deref(), Some("A. B."));
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::UnknownRule);
    }

    #[test]
    fn test_section_break_and_image() {
        let nodes = nodes("text\n!!section from 5\n![diagram](pic.png){300x200}");
        assert_eq!(nodes[1], Node::SectionBreak(SectionBreak { page_start: Some(5) }));
        assert_eq!(
            nodes[2],
            Node::Image(Image {
                alt: "diagram".to_string(),
                src: "pic.png".to_string(),
                width: Some(300),
                height: Some(200),
            })
        );
    }

    #[test]
    fn test_crlf_input() {
        let nodes = nodes("# Title\r\nbody\r\n");
        assert_eq!(nodes, vec![Node::title("Title", 1), Node::text("body")]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(dir.path().join("absent.g.md")).unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }
}
