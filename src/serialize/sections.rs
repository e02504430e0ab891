//! Section split: `SectionBreak` nodes become real section boundaries.
use log::debug;

use crate::document::{Node, Section};

/// Cut every section at its section-break nodes.
///
/// Nodes after a break move into a new section that takes the break's page
/// start; the break itself is dropped. Sections left without nodes are
/// removed. Breaks nested inside table cells are not touched here.
pub fn split_sections<T>(sections: Vec<Section<T>>) -> Vec<Section<T>> {
    let mut out = Vec::with_capacity(sections.len());
    for section in sections {
        let mut current = Section {
            page_start: section.page_start,
            nodes: Vec::new(),
        };
        for node in section.nodes {
            match node {
                Node::SectionBreak(brk) => {
                    debug!("section break, next section starts at {:?}", brk.page_start);
                    let finished = std::mem::replace(
                        &mut current,
                        Section {
                            page_start: brk.page_start,
                            nodes: Vec::new(),
                        },
                    );
                    out.push(finished);
                },
                other => current.nodes.push(other),
            }
        }
        out.push(current);
    }
    out.retain(|s| !s.nodes.is_empty());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SectionBreak;

    fn brk(page_start: Option<u32>) -> Node {
        Node::SectionBreak(SectionBreak { page_start })
    }

    #[test]
    fn test_break_starts_new_section() {
        let sections = vec![Section {
            page_start: Some(1),
            nodes: vec![Node::text("a"), brk(Some(5)), Node::text("b")],
        }];
        let out = split_sections(sections);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].page_start, Some(1));
        assert_eq!(out[0].nodes, vec![Node::text("a")]);
        assert_eq!(out[1].page_start, Some(5));
        assert_eq!(out[1].nodes, vec![Node::text("b")]);
    }

    #[test]
    fn test_repeated_breaks_and_empty_sections() {
        let sections = vec![Section {
            page_start: Some(1),
            nodes: vec![brk(None), Node::text("a"), brk(Some(3)), brk(None), Node::text("b")],
        }];
        let out = split_sections(sections);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].page_start, None);
        assert_eq!(out[1].page_start, None);
        assert_eq!(out[1].nodes, vec![Node::text("b")]);
        assert!(out.iter().flat_map(|s| &s.nodes).all(|n| !matches!(n, Node::SectionBreak(_))));
    }

    #[test]
    fn test_trailing_break_is_dropped() {
        let sections = vec![Section {
            page_start: Some(1),
            nodes: vec![Node::text("a"), brk(Some(9))],
        }];
        let out = split_sections(sections);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].nodes.len(), 1);
    }
}
