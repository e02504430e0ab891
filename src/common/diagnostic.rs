//! Non-fatal findings collected while compiling a document.
//!
//! Shape mismatches never abort a render: the offending rule is skipped and
//! a [`Diagnostic`] is returned next to the (partially transformed) document.
use std::fmt;

/// Category of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `!!rule` line with an unknown keyword
    UnknownRule,
    /// External document dictionary that is not valid JSON
    MalformedDictionary,
    /// Glossary heading not followed by a well-formed list
    GlossaryShape,
    /// Abbreviations heading not followed by a well-formed list
    AbbreviationsShape,
    /// References heading not followed by a list
    ReferencesShape,
}

/// A warning attached to a compilation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
