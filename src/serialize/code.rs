//! Code block lines, optionally colored by lexical category.
//!
//! Without the `highlight` feature, or for languages the tokenizer does not
//! know, every source line becomes a single uncolored span.

/// A piece of one code line with its display style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    pub text: String,
    /// Hex RGB color
    pub color: Option<&'static str>,
    pub bold: bool,
    pub italic: bool,
}

impl CodeSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
            italic: false,
        }
    }
}

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Comment,
    String,
    Number,
    Constant,
    Keyword,
    Function,
    Type,
    Variable,
    Attribute,
    Tag,
    Punctuation,
    Plain,
}

impl TokenCategory {
    /// Category of a dotted scope name such as `string.quoted.double.rust`.
    pub fn from_scope(scope: &str) -> Option<Self> {
        const RULES: &[(&str, TokenCategory)] = &[
            ("punctuation.definition.comment", TokenCategory::Comment),
            ("punctuation.definition.string", TokenCategory::String),
            ("comment", TokenCategory::Comment),
            ("string", TokenCategory::String),
            ("constant.numeric", TokenCategory::Number),
            ("constant", TokenCategory::Constant),
            ("keyword", TokenCategory::Keyword),
            ("storage", TokenCategory::Keyword),
            ("entity.name.function", TokenCategory::Function),
            ("support.function", TokenCategory::Function),
            ("variable.function", TokenCategory::Function),
            ("support.type.property-name", TokenCategory::Attribute),
            ("entity.other.attribute-name", TokenCategory::Attribute),
            ("entity.name.tag", TokenCategory::Tag),
            ("entity.name", TokenCategory::Type),
            ("support.type", TokenCategory::Type),
            ("support.class", TokenCategory::Type),
            ("variable", TokenCategory::Variable),
            ("punctuation", TokenCategory::Punctuation),
        ];
        RULES
            .iter()
            .find(|(prefix, _)| {
                scope
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
            })
            .map(|&(_, category)| category)
    }
}

/// Display style `(color, bold, italic)` of a category in language `lang`.
pub fn category_style(lang: &str, category: TokenCategory) -> (Option<&'static str>, bool, bool) {
    match (lang, category) {
        ("css" | "scss" | "less", TokenCategory::String) => (Some("0451A5"), false, false),
        ("css" | "scss" | "less", TokenCategory::Attribute) => (Some("E50000"), false, false),
        ("json", TokenCategory::String) => (Some("0451A5"), false, false),
        ("json", TokenCategory::Attribute) => (Some("A31515"), false, false),
        (_, TokenCategory::Comment) => (Some("008000"), false, true),
        (_, TokenCategory::String) => (Some("A31515"), false, false),
        (_, TokenCategory::Number) => (Some("098658"), false, false),
        (_, TokenCategory::Constant) => (Some("0000FF"), false, false),
        (_, TokenCategory::Keyword) => (Some("0000FF"), true, false),
        (_, TokenCategory::Function) => (Some("795E26"), false, false),
        (_, TokenCategory::Type) => (Some("267F99"), false, false),
        (_, TokenCategory::Variable) => (Some("001080"), false, false),
        (_, TokenCategory::Attribute) => (Some("E50000"), false, false),
        (_, TokenCategory::Tag) => (Some("800000"), false, false),
        (_, TokenCategory::Punctuation | TokenCategory::Plain) => (None, false, false),
    }
}

/// One uncolored span per source line; blank lines stay empty.
pub fn plain_lines(body: &str) -> Vec<Vec<CodeSpan>> {
    body.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                Vec::new()
            } else {
                vec![CodeSpan::plain(line)]
            }
        })
        .collect()
}

/// Split `body` into styled lines.
pub fn code_lines(lang: &str, body: &str, highlight: bool) -> Vec<Vec<CodeSpan>> {
    if !highlight {
        return plain_lines(body);
    }
    #[cfg(feature = "highlight")]
    {
        if let Some(lines) = highlight::tokenize(lang, body) {
            return lines;
        }
    }
    #[cfg(not(feature = "highlight"))]
    log::debug!("highlighting not compiled in, {lang:?} block left plain");
    plain_lines(body)
}

#[cfg(feature = "highlight")]
mod highlight {
    use log::{debug, warn};
    use once_cell::sync::Lazy;
    use syntect::easy::ScopeRegionIterator;
    use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
    use syntect::util::LinesWithEndings;

    use super::{CodeSpan, TokenCategory, category_style};

    static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

    fn category(stack: &ScopeStack) -> TokenCategory {
        stack
            .as_slice()
            .iter()
            .rev()
            .find_map(|scope| TokenCategory::from_scope(&scope.build_string()))
            .unwrap_or(TokenCategory::Plain)
    }

    /// `None` when the language is unknown or the tokenizer fails.
    pub(super) fn tokenize(lang: &str, body: &str) -> Option<Vec<Vec<CodeSpan>>> {
        let lang = lang.trim().to_ascii_lowercase();
        let Some(syntax) = SYNTAXES.find_syntax_by_token(&lang) else {
            debug!("no syntax for {lang:?}, code left plain");
            return None;
        };
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(body) {
            let ops = match state.parse_line(line, &SYNTAXES) {
                Ok(ops) => ops,
                Err(err) => {
                    warn!("tokenizer failed on {lang:?} block: {err}");
                    return None;
                },
            };
            let mut spans: Vec<CodeSpan> = Vec::new();
            for (text, op) in ScopeRegionIterator::new(&ops, line) {
                if let Err(err) = stack.apply(op) {
                    warn!("scope stack error in {lang:?} block: {err:?}");
                    return None;
                }
                let text = text.trim_end_matches(['\n', '\r']);
                if text.is_empty() {
                    continue;
                }
                let (color, bold, italic) = category_style(&lang, category(&stack));
                match spans.last_mut() {
                    Some(last) if last.color == color && last.bold == bold && last.italic == italic => {
                        last.text.push_str(text);
                    },
                    _ => spans.push(CodeSpan {
                        text: text.to_string(),
                        color,
                        bold,
                        italic,
                    }),
                }
            }
            lines.push(spans);
        }
        if body.is_empty() || body.ends_with('\n') {
            lines.push(Vec::new());
        }
        Some(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines() {
        let lines = code_lines("rust", "let a = 1;\n\n  b", false);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![CodeSpan::plain("let a = 1;")]);
        assert!(lines[1].is_empty());
        assert_eq!(lines[2][0].text, "  b");
    }

    #[test]
    fn test_scope_categories() {
        assert_eq!(
            TokenCategory::from_scope("comment.line.double-slash.rust"),
            Some(TokenCategory::Comment)
        );
        assert_eq!(
            TokenCategory::from_scope("constant.numeric.integer.decimal.rust"),
            Some(TokenCategory::Number)
        );
        assert_eq!(
            TokenCategory::from_scope("constant.language.rust"),
            Some(TokenCategory::Constant)
        );
        assert_eq!(
            TokenCategory::from_scope("punctuation.definition.string.begin.rust"),
            Some(TokenCategory::String)
        );
        assert_eq!(TokenCategory::from_scope("stringy.thing"), None);
        assert_eq!(TokenCategory::from_scope("source.rust"), None);
    }

    #[test]
    fn test_language_overrides() {
        assert_eq!(category_style("rust", TokenCategory::String).0, Some("A31515"));
        assert_eq!(category_style("css", TokenCategory::String).0, Some("0451A5"));
        assert_eq!(category_style("json", TokenCategory::String).0, Some("0451A5"));
        assert!(category_style("c", TokenCategory::Keyword).1);
    }

    #[cfg(feature = "highlight")]
    #[test]
    fn test_highlighted_rust() {
        let lines = code_lines("rust", "fn main() {\n    // hi\n}", true);
        assert_eq!(lines.len(), 3);
        let text: String = lines[1].iter().map(|s| s.text.as_str()).collect();
        assert_eq!(text, "    // hi");
        assert!(lines[1].iter().any(|s| s.text.contains("hi") && s.color == Some("008000")));
        assert!(lines[0].iter().any(|s| s.text.contains("fn") && s.bold));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let lines = code_lines("no-such-language", "x\ny", true);
        assert_eq!(lines, vec![vec![CodeSpan::plain("x")], vec![CodeSpan::plain("y")]]);
    }
}
