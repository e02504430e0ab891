//! Rune sequences to paragraph content: runs, hyperlinks and bookmarks.
use std::collections::HashSet;

use log::debug;

use crate::common::text::collapse_whitespace;
use crate::document::{LinkTarget, Rune};
use crate::inline::split_scripts;
use crate::ooxml::docx::writer::{
    HyperlinkTarget, MutableBookmark, MutableHyperlink, MutableParagraph, MutableRun,
};

/// Bookmark ids and names handed out so far in one document.
#[derive(Debug, Default)]
pub struct Bookmarks {
    next_id: u32,
    names: HashSet<String>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id for `anchor`; `None` if the anchor was already placed.
    fn claim(&mut self, anchor: &str) -> Option<u32> {
        if !self.names.insert(anchor.to_string()) {
            debug!("duplicate anchor {anchor:?} ignored");
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        Some(id)
    }
}

/// Convert one rune into a run; `font_size` is in half-points.
pub fn rune_to_run(rune: &Rune, font_size: Option<u32>) -> MutableRun {
    let mut run = MutableRun::new(&collapse_whitespace(&rune.text));
    if rune.is_bold() {
        run.bold(true);
    }
    if rune.is_italic() {
        run.italic(true);
    }
    if let Some(ref color) = rune.color {
        run.color(color);
    }
    if let Some(lang) = rune.lang {
        run.lang(lang.tag());
    }
    if rune.line_break {
        run.break_before();
    }
    if let Some(size) = font_size {
        run.font_size(size);
    }
    run
}

fn link_target(link: &LinkTarget) -> HyperlinkTarget {
    match link {
        LinkTarget::Anchor(anchor) => HyperlinkTarget::Anchor(anchor.clone()),
        LinkTarget::External(url) => HyperlinkTarget::External(url.clone()),
    }
}

/// Append `runes` to `para`.
///
/// Runes are first re-split at script boundaries so every run carries one
/// language. Consecutive runes sharing a link become one hyperlink, and
/// consecutive runes sharing an anchor are wrapped in one bookmark.
pub fn append_runes(
    para: &mut MutableParagraph,
    runes: &[Rune],
    bookmarks: &mut Bookmarks,
    font_size: Option<u32>,
) {
    let runes = split_scripts(runes);
    let mut rest = runes.as_slice();
    while let Some(first) = rest.first() {
        let len = rest
            .iter()
            .take_while(|r| r.link == first.link && r.anchor == first.anchor)
            .count();
        let (group, tail) = rest.split_at(len);
        rest = tail;

        let bookmark = first
            .anchor
            .as_deref()
            .and_then(|anchor| bookmarks.claim(anchor).map(|id| (id, anchor)));
        if let Some((id, anchor)) = bookmark {
            para.start_bookmark(MutableBookmark::new(id, anchor));
        }

        match first.link {
            Some(ref link) => {
                let mut hyperlink = MutableHyperlink::new(link_target(link));
                for rune in group {
                    hyperlink.add_run(rune_to_run(rune, font_size));
                }
                para.add_hyperlink(hyperlink);
            },
            None => {
                for rune in group {
                    para.add_run(rune_to_run(rune, font_size));
                }
            },
        }

        if let Some((id, _)) = bookmark {
            para.end_bookmark(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Emphasis, ScriptLang};
    use crate::ooxml::docx::writer::relmap::PartContext;

    fn xml(para: &MutableParagraph) -> String {
        let mut ctx = PartContext::new();
        let mut out = String::new();
        para.to_xml(&mut out, &mut ctx).unwrap();
        out
    }

    #[test]
    fn test_rune_properties() {
        let mut rune = Rune::plain("жирный  текст");
        rune.emphasis = Emphasis::BOLD | Emphasis::ITALIC;
        rune.color = Some("FF0000".to_string());
        rune.lang = Some(ScriptLang::Cyrillic);
        rune.line_break = true;
        let run = rune_to_run(&rune, Some(24));
        assert_eq!(run.get_text(), "жирный текст");

        let mut para = MutableParagraph::new();
        para.add_run(run);
        let out = xml(&para);
        assert!(out.contains("<w:b/>"));
        assert!(out.contains("<w:i/>"));
        assert!(out.contains(r#"<w:color w:val="FF0000"/>"#));
        assert!(out.contains(r#"<w:sz w:val="24"/>"#));
        assert!(out.contains(r#"<w:lang w:val="ru-RU"/>"#));
        assert!(out.contains("<w:br/>"));
    }

    #[test]
    fn test_mixed_scripts_get_separate_runs() {
        let mut para = MutableParagraph::new();
        append_runes(&mut para, &[Rune::plain("язык Rust")], &mut Bookmarks::new(), None);
        let out = xml(&para);
        assert!(out.contains(r#"<w:lang w:val="ru-RU"/>"#));
        assert!(out.contains(r#"<w:lang w:val="en-US"/>"#));
        assert_eq!(para.text(), "язык Rust");
    }

    #[test]
    fn test_link_groups_into_one_hyperlink() {
        let mut bold = Rune::plain("bold ");
        bold.link = Some(LinkTarget::External("https://example.com".into()));
        bold.emphasis = Emphasis::BOLD;
        let mut plain = Rune::plain("plain");
        plain.link = bold.link.clone();
        let mut para = MutableParagraph::new();
        append_runes(&mut para, &[bold, plain, Rune::plain(" after")], &mut Bookmarks::new(), None);
        let out = xml(&para);
        assert_eq!(out.matches("<w:hyperlink ").count(), 1);
        assert!(out.contains(r#"<w:rStyle w:val="Hyperlink"/>"#));
        assert!(out.find("</w:hyperlink>").unwrap() < out.find(" after").unwrap());
    }

    #[test]
    fn test_anchor_link_and_bookmark_agree() {
        let mut target = Rune::plain("Глава");
        target.anchor = Some("intro".into());
        let mut link = Rune::plain("see");
        link.link = Some(LinkTarget::Anchor("intro".into()));

        let mut bookmarks = Bookmarks::new();
        let mut para = MutableParagraph::new();
        append_runes(&mut para, &[target.clone()], &mut bookmarks, None);
        append_runes(&mut para, &[link], &mut bookmarks, None);
        // The same anchor twice only gets one bookmark.
        append_runes(&mut para, &[target], &mut bookmarks, None);

        let out = xml(&para);
        assert_eq!(out.matches("<w:bookmarkStart").count(), 1);
        assert_eq!(out.matches("<w:bookmarkEnd").count(), 1);
        assert!(out.contains(r#"w:name="intro""#));
        assert!(out.contains(r#"w:anchor="intro""#));
    }
}
