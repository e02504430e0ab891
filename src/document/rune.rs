//! Styled inline atoms produced by the inline resolver.
use bitflags::bitflags;

bitflags! {
    /// Emphasis applied to a run of text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Emphasis: u8 {
        const BOLD = 0b01;
        const ITALIC = 0b10;
    }
}

/// Alphabet inferred for a run, used for per-run language metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptLang {
    Latin,
    Cyrillic,
}

impl ScriptLang {
    /// Classify a single character; `None` for digits, punctuation and other scripts.
    pub fn of(c: char) -> Option<Self> {
        match c {
            'a'..='z' | 'A'..='Z' => Some(Self::Latin),
            '\u{00C0}'..='\u{024F}' if c.is_alphabetic() => Some(Self::Latin),
            '\u{0400}'..='\u{052F}' => Some(Self::Cyrillic),
            _ => None,
        }
    }

    /// BCP 47 tag written into the run properties.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Latin => "en-US",
            Self::Cyrillic => "ru-RU",
        }
    }
}

/// Destination of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Bookmark inside the document (`#id`)
    Anchor(String),
    /// External URL
    External(String),
}

impl LinkTarget {
    pub fn parse(target: &str) -> Self {
        match target.strip_prefix('#') {
            Some(anchor) => Self::Anchor(anchor.to_string()),
            None => Self::External(target.to_string()),
        }
    }
}

/// One styled inline atom.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rune {
    pub text: String,
    /// Bookmark name placed around this atom
    pub anchor: Option<String>,
    pub link: Option<LinkTarget>,
    pub emphasis: Emphasis,
    /// Hex RGB color, e.g. `FF0000`
    pub color: Option<String>,
    /// Forced line break before the text
    pub line_break: bool,
    pub lang: Option<ScriptLang>,
}

impl Rune {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A sub-atom carrying this atom's styling but no line break.
    pub fn derive(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: self.anchor.clone(),
            link: self.link.clone(),
            emphasis: self.emphasis,
            color: self.color.clone(),
            line_break: false,
            lang: self.lang,
        }
    }

    #[inline]
    pub fn is_bold(&self) -> bool {
        self.emphasis.contains(Emphasis::BOLD)
    }

    #[inline]
    pub fn is_italic(&self) -> bool {
        self.emphasis.contains(Emphasis::ITALIC)
    }
}

/// Concatenated text of a rune sequence.
pub fn plain_text(runes: &[Rune]) -> String {
    runes.iter().map(|r| r.text.as_str()).collect()
}
