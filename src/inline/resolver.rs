//! Raw text to styled atoms.
use once_cell::sync::Lazy;
use regex::Regex;

use super::rainbow::HueCursor;
use crate::common::text::collapse_whitespace;
use crate::document::{Document, Emphasis, LinkTarget, Rune, Runes, RunicDocument};

static BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*<br>\s*").expect("valid break pattern"));
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"\n]*?)""#).expect("valid quote pattern"));
/// `[label](target)` or `[label]{#anchor}`
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]\n]*?)\](?:\(([^)\n]*?)\)|\{#([^}\n]*?)\})").expect("valid link pattern")
});

/// Resolve every text field of `document`, threading one hue cursor
/// through the whole pass.
pub fn resolve_document(document: Document, cursor: &mut HueCursor) -> RunicDocument {
    let rainbow = document.settings.rainbow;
    document.map_text(&mut |text: String| resolve(&text, rainbow, cursor))
}

/// Resolve one raw string.
pub fn resolve(text: &str, rainbow: bool, cursor: &mut HueCursor) -> Runes {
    let normalized = normalize(text);
    let mut runes = split_links(&normalized);
    runes = runes.iter().flat_map(split_lines).collect();
    runes = split_emphasis(runes, "***", Emphasis::BOLD | Emphasis::ITALIC);
    runes = split_emphasis(runes, "**", Emphasis::BOLD);
    runes = split_emphasis(runes, "*", Emphasis::ITALIC);
    if rainbow {
        runes = runes.iter().flat_map(|r| colorize(r, cursor)).collect();
    }
    runes.retain(|r| !r.text.is_empty() || r.line_break || r.anchor.is_some());
    runes
}

/// Break tokens, dashes and straight quotes.
fn normalize(text: &str) -> String {
    let text = BREAK_RE.replace_all(text, "\n");
    let text = text.replace('—', "-").replace(" - ", " \u{2013} ");
    QUOTE_RE.replace_all(&text, "«$1»").into_owned()
}

fn split_links(text: &str) -> Vec<Rune> {
    let mut runes = Vec::new();
    let mut last = 0;
    for caps in LINK_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        runes.push(Rune::plain(&text[last..whole.start()]));
        let mut rune = Rune::plain(&caps[1]);
        if let Some(target) = caps.get(2) {
            rune.link = Some(LinkTarget::parse(target.as_str()));
        } else if let Some(anchor) = caps.get(3) {
            rune.anchor = Some(anchor.as_str().to_string());
        }
        runes.push(rune);
        last = whole.end();
    }
    runes.push(Rune::plain(&text[last..]));
    runes
}

/// One atom per line; every line but the first starts with a forced break.
fn split_lines(rune: &Rune) -> Vec<Rune> {
    rune.text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let mut piece = rune.derive(collapse_whitespace(line));
            piece.line_break = if i == 0 { rune.line_break } else { true };
            piece
        })
        .collect()
}

/// Odd-indexed spans between `delimiter`s gain `flags`.
fn split_emphasis(runes: Vec<Rune>, delimiter: &str, flags: Emphasis) -> Vec<Rune> {
    let mut out = Vec::with_capacity(runes.len());
    for rune in runes {
        if !rune.text.contains(delimiter) {
            out.push(rune);
            continue;
        }
        for (i, span) in rune.text.split(delimiter).enumerate() {
            let mut piece = rune.derive(span);
            if i == 0 {
                piece.line_break = rune.line_break;
            }
            if i % 2 == 1 {
                piece.emphasis |= flags;
            }
            out.push(piece);
        }
    }
    out
}

/// One atom per character, each with the next hue.
fn colorize(rune: &Rune, cursor: &mut HueCursor) -> Vec<Rune> {
    if rune.text.is_empty() {
        return vec![rune.clone()];
    }
    rune.text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let mut piece = rune.derive(c.to_string());
            piece.line_break = i == 0 && rune.line_break;
            piece.color = Some(cursor.next_color());
            piece
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Node, plain_text};

    fn run(text: &str) -> Runes {
        resolve(text, false, &mut HueCursor::new())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(run("hello   world"), vec![Rune::plain("hello world")]);
    }

    #[test]
    fn test_typography() {
        assert_eq!(plain_text(&run("a — b")), "a \u{2013} b");
        assert_eq!(plain_text(&run(r#"say "hi" and "bye""#)), "say «hi» and «bye»");
    }

    #[test]
    fn test_line_breaks() {
        let runes = run("one<br>two\nthree");
        let texts: Vec<_> = runes.iter().map(|r| (r.text.as_str(), r.line_break)).collect();
        assert_eq!(texts, vec![("one", false), ("two", true), ("three", true)]);
    }

    #[test]
    fn test_emphasis_layers() {
        let runes = run("a ***b*** **c *d* e** f");
        let styled: Vec<_> = runes
            .iter()
            .map(|r| (r.text.as_str(), r.is_bold(), r.is_italic()))
            .collect();
        assert_eq!(
            styled,
            vec![
                ("a ", false, false),
                ("b", true, true),
                (" ", false, false),
                ("c ", true, false),
                ("d", true, true),
                (" e", true, false),
                (" f", false, false),
            ]
        );
    }

    #[test]
    fn test_links_are_separate() {
        let runes = run("see [one](https://a.org) and [two](#sec-2)");
        assert_eq!(runes[1].text, "one");
        assert_eq!(runes[1].link, Some(LinkTarget::External("https://a.org".to_string())));
        assert_eq!(runes[2].text, " and ");
        assert_eq!(runes[2].link, None);
        assert_eq!(runes[3].link, Some(LinkTarget::Anchor("sec-2".to_string())));
    }

    #[test]
    fn test_emphasis_inside_link() {
        let runes = run("[**bold** link](x.html)");
        assert_eq!(runes.len(), 2);
        assert!(runes.iter().all(|r| r.link.is_some()));
        assert!(runes[0].is_bold() && !runes[1].is_bold());
    }

    #[test]
    fn test_anchor() {
        let runes = run("[Figure 1]{#fig1} shows");
        assert_eq!(runes[0].text, "Figure 1");
        assert_eq!(runes[0].anchor.as_deref(), Some("fig1"));
        assert_eq!(runes[1].anchor, None);
    }

    #[test]
    fn test_rainbow_cursor_continues() {
        let mut cursor = HueCursor::new();
        let first = resolve("ab", true, &mut cursor);
        let second = resolve("c\nd", true, &mut cursor);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].color.as_deref(), Some("FF0000"));
        assert_ne!(first[0].color, first[1].color);
        assert_eq!(second.len(), 2);
        assert!(second[1].line_break);
        assert_ne!(second[0].color, first[1].color);
    }

    #[test]
    fn test_resolve_document_keeps_shape() {
        let mut document = Document::new();
        document.push(Node::title("Intro **now**", 1));
        document.push(Node::text("body"));
        let runic = resolve_document(document, &mut HueCursor::new());
        let Node::Title(title) = &runic.sections[0].nodes[0] else {
            panic!("expected title");
        };
        assert_eq!(title.level, 1);
        assert_eq!(plain_text(&title.text), "Intro now");
        assert!(title.text[1].is_bold());
    }
}
