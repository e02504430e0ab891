//! Line classifier: one raw source line to one tagged line.
//!
//! Classification only looks at the line itself; everything that depends on
//! neighbouring lines (lists, fences, tables) is the parser's job.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::common::text::leading_number;

/// Four spaces or one tab raise the depth by one.
const INDENT_SPACES: &str = "    ";

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[(.*)\]\((.*)\)(\{(.*)\})?").expect("valid image pattern"));
static PAGE_FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"from\s+(\d+)").expect("valid section pattern"));

/// Errors raised for lines no document can contain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("heading level {0} is deeper than 6")]
    HeadingLevel(usize),
}

/// Leading marker of a classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// `#`..`######`
    Heading(u8),
    /// `*` or `-`
    Bullet,
    /// `N.` or `N)` with its number
    Ordered(u32),
    /// Indented line; `text` holds the remainder with every indent unit removed
    Indent,
    Image {
        alt: String,
        src: String,
        width: Option<u32>,
        height: Option<u32>,
    },
    /// Three backticks; `text` holds the rest of the line
    CodeFence,
    Comment,
    /// `!!section [from N]`
    SectionBreak(Option<u32>),
    /// `!!rule ...`; `text` holds the directive
    Rule,
    Plain,
}

impl Marker {
    #[inline]
    pub fn is_list_marker(&self) -> bool {
        matches!(self, Self::Bullet | Self::Ordered(_))
    }

    /// Marker that continues a list of the given kind.
    #[inline]
    pub fn continues_list(&self, ordered: bool) -> bool {
        match self {
            Self::Bullet => !ordered,
            Self::Ordered(_) => ordered,
            _ => false,
        }
    }
}

/// A classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub marker: Marker,
    pub text: String,
    /// Indentation depth; 0 for every non-indented marker
    pub depth: usize,
}

impl Line {
    /// Empty plain line.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.marker == Marker::Plain && self.text.is_empty()
    }

    /// Classify the text of an indented line as if it started the line.
    pub fn reclassify(&self) -> Result<Line, ClassifyError> {
        classify(&self.text)
    }

    fn plain(text: &str) -> Self {
        Self {
            marker: Marker::Plain,
            text: text.trim().to_string(),
            depth: 0,
        }
    }
}

/// Classify one raw line.
pub fn classify(line: &str) -> Result<Line, ClassifyError> {
    let mut rest = line;
    let mut depth = 0;
    loop {
        if let Some(stripped) = rest.strip_prefix(INDENT_SPACES) {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('\t') {
            rest = stripped;
        } else {
            break;
        }
        depth += 1;
    }
    if depth > 0 {
        return Ok(Line {
            marker: Marker::Indent,
            text: rest.trim().to_string(),
            depth,
        });
    }

    let trimmed = line.trim();
    let mut tokens = trimmed.split_whitespace();
    let first = tokens.next().unwrap_or("");
    let prefix = first.to_lowercase();
    let text = tokens.collect::<Vec<_>>().join(" ");

    if prefix.starts_with('!')
        && let Some(caps) = IMAGE_RE.captures(line)
    {
        let (width, height) = caps
            .get(4)
            .map(|size| parse_size(size.as_str()))
            .unwrap_or((None, None));
        return Ok(Line {
            marker: Marker::Image {
                alt: caps[1].replace("\\n", "\n"),
                src: caps[2].to_string(),
                width,
                height,
            },
            text: trimmed.to_string(),
            depth,
        });
    }

    if prefix.starts_with("```") {
        return Ok(Line {
            marker: Marker::CodeFence,
            text: trimmed[3..].to_string(),
            depth,
        });
    }
    if prefix.starts_with("<!--") {
        return Ok(Line {
            marker: Marker::Comment,
            text: trimmed["<!--".len()..].trim().to_string(),
            depth,
        });
    }

    let marker = match prefix.as_str() {
        "*" | "-" => Marker::Bullet,
        "!!section" => {
            let page = PAGE_FROM_RE
                .captures(&text)
                .and_then(|caps| caps[1].parse().ok());
            Marker::SectionBreak(page)
        },
        "!!rule" => Marker::Rule,
        p if !p.is_empty() && p.chars().all(|c| c == '#') => {
            let level = p.len();
            if level > 6 {
                return Err(ClassifyError::HeadingLevel(level));
            }
            Marker::Heading(level as u8)
        },
        p => match ordered_index(p) {
            Some(index) => Marker::Ordered(index),
            None => return Ok(Line::plain(line)),
        },
    };
    Ok(Line {
        marker,
        text,
        depth,
    })
}

/// `12.` or `12)` gives 12.
fn ordered_index(prefix: &str) -> Option<u32> {
    let stem = prefix
        .strip_suffix('.')
        .or_else(|| prefix.strip_suffix(')'))?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// `WxH` with either side optional.
fn parse_size(size: &str) -> (Option<u32>, Option<u32>) {
    let mut parts = size.split('x');
    let width = parts.next().and_then(leading_number);
    let height = parts.next().and_then(leading_number);
    (width, height)
}
