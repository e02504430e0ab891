//! Script-boundary splitting of resolved atoms.
use crate::document::{Rune, ScriptLang};

/// Split every atom where the text switches between Latin and Cyrillic.
pub fn split_scripts(runes: &[Rune]) -> Vec<Rune> {
    runes.iter().flat_map(split_script).collect()
}

/// Split one atom at script transitions and tag each piece with its language.
///
/// Characters outside both alphabets stay with the run they follow (or the
/// first run, when leading). The anchor and forced break stay on the first
/// piece only.
pub fn split_script(rune: &Rune) -> Vec<Rune> {
    let text = rune.text.as_str();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut current: Option<ScriptLang> = None;
    for (index, c) in text.char_indices() {
        let Some(lang) = ScriptLang::of(c) else {
            continue;
        };
        match current {
            Some(active) if active != lang => {
                pieces.push(piece(rune, &text[start..index], current, pieces.is_empty()));
                start = index;
                current = Some(lang);
            },
            Some(_) => {},
            None => current = Some(lang),
        }
    }
    pieces.push(piece(rune, &text[start..], current, pieces.is_empty()));
    pieces
}

fn piece(rune: &Rune, text: &str, lang: Option<ScriptLang>, first: bool) -> Rune {
    let mut out = rune.derive(text);
    if first {
        out.line_break = rune.line_break;
    } else {
        out.anchor = None;
    }
    out.lang = lang;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Emphasis, plain_text};
    use proptest::prelude::*;

    #[test]
    fn test_mixed_scripts() {
        let mut rune = Rune::plain("Протокол HTTP/2 описан");
        rune.emphasis = Emphasis::BOLD;
        rune.anchor = Some("http".to_string());
        rune.line_break = true;
        let pieces = split_script(&rune);
        let texts: Vec<_> = pieces.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Протокол ", "HTTP/2 ", "описан"]);
        assert_eq!(pieces[0].lang, Some(ScriptLang::Cyrillic));
        assert_eq!(pieces[1].lang, Some(ScriptLang::Latin));
        assert!(pieces.iter().all(|r| r.is_bold()));
        assert!(pieces[0].line_break && pieces[0].anchor.is_some());
        assert!(pieces[1..].iter().all(|r| !r.line_break && r.anchor.is_none()));
    }

    #[test]
    fn test_neutral_only() {
        let pieces = split_script(&Rune::plain("2024 - 42"));
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].lang, None);
    }

    #[test]
    fn test_leading_neutral_joins_first_run() {
        let pieces = split_script(&Rune::plain("(1) abc где"));
        assert_eq!(pieces[0].text, "(1) abc ");
        assert_eq!(pieces[0].lang, Some(ScriptLang::Latin));
        assert_eq!(pieces[1].text, "где");
    }

    proptest! {
        #[test]
        fn prop_split_is_lossless(text in "[a-zA-Zа-яА-Я0-9 .,ё€-]{0,40}") {
            let rune = Rune::plain(text.clone());
            prop_assert_eq!(plain_text(&split_script(&rune)), text);
        }

        #[test]
        fn prop_pieces_hold_one_script(text in "[a-zа-я0-9 ]{1,40}") {
            for piece in split_script(&Rune::plain(text)) {
                let scripts: std::collections::HashSet<_> =
                    piece.text.chars().filter_map(ScriptLang::of).collect();
                prop_assert!(scripts.len() <= 1);
            }
        }
    }
}
