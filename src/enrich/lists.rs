//! List punctuation normalizer.
//!
//! Every leaf item gets exactly one terminator: `:` before a nested list,
//! `.` on the last item of the outermost list, otherwise `;` for long or
//! nested lists and `,` for short flat ones.
use crate::common::text::{lowercase_first, trim_end_chars, word_count};
use crate::document::{List, ListEntry, Node};

/// Punctuation stripped from an item before its terminator is appended.
pub const TERMINATORS: [char; 5] = ['.', ',', ';', ':', '!'];

/// Items longer than this many words make the whole list "long".
const LONG_ITEM_WORDS: usize = 5;

/// Normalize every list in `nodes`, descending into table cells.
///
/// Lists flagged with the alternate (bibliography) style keep their
/// punctuation.
pub fn normalize_nodes(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::List(list) if !list.alternate_style => normalize(list, true, false),
            Node::Table(table) => {
                for row in &mut table.rows {
                    normalize_nodes(row);
                }
            },
            _ => {},
        }
    }
}

/// Normalize one list; `is_last_item` is true only along the chain of last
/// items from the outermost list.
pub fn normalize(list: &mut List, is_last_item: bool, is_sublist: bool) {
    let is_long = list
        .items
        .iter()
        .any(|e| matches!(e, ListEntry::Item(item) if word_count(&item.text) > LONG_ITEM_WORDS));
    let has_sublist = list.items.iter().any(|e| matches!(e, ListEntry::List(_)));
    let ending = if is_long || has_sublist || is_sublist { ';' } else { ',' };

    let count = list.items.len();
    for index in 0..count {
        let is_last = index + 1 == count;
        let before_list = matches!(list.items.get(index + 1), Some(ListEntry::List(_)));
        match &mut list.items[index] {
            ListEntry::List(nested) => normalize(nested, is_last_item && is_last, true),
            ListEntry::Item(item) => {
                let end = if before_list {
                    ':'
                } else if is_last_item && is_last {
                    '.'
                } else {
                    ending
                };
                item.text = terminate(&item.text, end);
            },
        }
    }
}

/// Lower-case the first letter, strip trailing punctuation and append `end`.
pub fn terminate(text: &str, end: char) -> String {
    let mut out = lowercase_first(trim_end_chars(text.trim_end(), &TERMINATORS));
    out.push(end);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;
    use proptest::prelude::*;

    fn texts(list: &List) -> Vec<String> {
        let mut out = Vec::new();
        for entry in &list.items {
            match entry {
                ListEntry::Item(item) => out.push(item.text.clone()),
                ListEntry::List(nested) => out.extend(texts(nested)),
            }
        }
        out
    }

    fn parsed_list(source: &str) -> List {
        let mut nodes = markup::parse(source).unwrap().document.sections.remove(0).nodes;
        normalize_nodes(&mut nodes);
        match nodes.remove(0) {
            Node::List(list) => list,
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_long_list() {
        let list = parsed_list("* first item\n* second item that is quite a bit longer than five words indeed");
        assert_eq!(
            texts(&list),
            vec!["first item;", "second item that is quite a bit longer than five words indeed."]
        );
    }

    #[test]
    fn test_short_list_uses_commas() {
        let list = parsed_list("* Red\n* Green.\n* Blue;");
        assert_eq!(texts(&list), vec!["red,", "green,", "blue."]);
    }

    #[test]
    fn test_nested_lists() {
        let list = parsed_list("* Fruits\n    * apple\n    * pear\n* Vegetables\n    * carrot");
        assert_eq!(
            texts(&list),
            vec!["fruits:", "apple;", "pear;", "vegetables:", "carrot."]
        );
    }

    #[test]
    fn test_alternate_style_untouched() {
        let mut list = List::with_item(true, 1, "Knuth D. The Art of Computer Programming.");
        list.alternate_style = true;
        let mut nodes = vec![Node::List(list.clone())];
        normalize_nodes(&mut nodes);
        assert_eq!(nodes, vec![Node::List(list)]);
    }

    #[test]
    fn test_lists_inside_tables() {
        let mut nodes = vec![Node::Table(crate::document::Table {
            caption: None,
            rows: vec![vec![Node::List(List::with_item(false, 1, "Cell item"))]],
            normal_font_size: false,
        })];
        normalize_nodes(&mut nodes);
        let Node::Table(table) = &nodes[0] else {
            panic!("expected table");
        };
        assert!(matches!(&table.rows[0][0], Node::List(l) if texts(l) == vec!["cell item."]));
    }

    proptest! {
        #[test]
        fn prop_terminate_strips_all_trailing_punctuation(
            stem in "[a-zа-я][a-zа-я ]{0,20}[a-zа-я]",
            tail in "[.,;:!]{0,6}",
            end in prop::sample::select(vec!['.', ',', ';', ':']),
        ) {
            let out = terminate(&format!("{stem}{tail}"), end);
            prop_assert_eq!(out, format!("{stem}{end}"));
        }

        #[test]
        fn prop_terminate_is_idempotent(
            text in "[A-Za-zА-Яа-я][A-Za-zА-Яа-я ,.!]{0,30}",
            end in prop::sample::select(vec!['.', ',', ';', ':']),
        ) {
            let once = terminate(&text, end);
            prop_assert_eq!(terminate(&once, end), once.clone());
        }
    }
}
