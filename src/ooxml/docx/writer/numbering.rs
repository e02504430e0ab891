/// Numbering definitions (`word/numbering.xml`).
///
/// Every definition is written as an `abstractNum` plus a `num` instance
/// with the same id, so a paragraph's `numId` maps one-to-one onto the list
/// that registered it.
use crate::ooxml::error::Result;
use crate::ooxml::xml::{XML_DECLARATION, escape_xml};
use std::fmt::Write as FmtWrite;

/// Number format of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    Decimal,
    Bullet,
}

impl NumberFormat {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::Bullet => "bullet",
        }
    }
}

/// One level of a numbering definition.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberingLevel {
    pub level: u32,
    pub format: NumberFormat,
    /// Label template such as `%1)`
    pub text: String,
    pub start: u32,
    /// Left indent in twips
    pub indent_left: i32,
    /// First line indent in twips; negative hangs
    pub indent_first_line: i32,
}

impl NumberingLevel {
    fn to_xml(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<w:lvl w:ilvl="{}"><w:start w:val="{}"/><w:numFmt w:val="{}"/><w:lvlText w:val="{}"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{}""#,
            self.level,
            self.start,
            self.format.as_str(),
            escape_xml(&self.text),
            self.indent_left
        )?;
        if self.indent_first_line >= 0 {
            write!(xml, r#" w:firstLine="{}""#, self.indent_first_line)?;
        } else {
            write!(xml, r#" w:hanging="{}""#, -self.indent_first_line)?;
        }
        xml.push_str("/></w:pPr></w:lvl>");
        Ok(())
    }
}

/// A numbering definition with lazily registered levels.
#[derive(Debug, Clone, Default)]
pub struct NumberingDefinition {
    levels: Vec<NumberingLevel>,
}

impl NumberingDefinition {
    pub fn levels(&self) -> &[NumberingLevel] {
        &self.levels
    }

    pub fn has_level(&self, level: u32) -> bool {
        self.levels.iter().any(|l| l.level == level)
    }

    /// Register a level; an already registered level is kept as is.
    pub fn add_level(&mut self, level: NumberingLevel) {
        if self.has_level(level.level) {
            return;
        }
        self.levels.push(level);
        self.levels.sort_by_key(|l| l.level);
    }
}

/// Collection of numbering definitions for one document.
#[derive(Debug, Clone, Default)]
pub struct MutableNumbering {
    definitions: Vec<NumberingDefinition>,
}

impl MutableNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh definition; returns its `numId`.
    pub fn add_definition(&mut self) -> u32 {
        self.definitions.push(NumberingDefinition::default());
        self.definitions.len() as u32
    }

    pub fn definition(&self, num_id: u32) -> Option<&NumberingDefinition> {
        self.definitions.get((num_id as usize).checked_sub(1)?)
    }

    pub fn definition_mut(&mut self, num_id: u32) -> Option<&mut NumberingDefinition> {
        self.definitions.get_mut((num_id as usize).checked_sub(1)?)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(512 + self.definitions.len() * 512);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#);
        for (i, definition) in self.definitions.iter().enumerate() {
            write!(xml, r#"<w:abstractNum w:abstractNumId="{}">"#, i + 1)?;
            xml.push_str(r#"<w:multiLevelType w:val="hybridMultilevel"/>"#);
            for level in &definition.levels {
                level.to_xml(&mut xml)?;
            }
            xml.push_str("</w:abstractNum>");
        }
        // All abstractNum elements must precede the num elements.
        for i in 1..=self.definitions.len() {
            write!(
                xml,
                r#"<w:num w:numId="{i}"><w:abstractNumId w:val="{i}"/></w:num>"#
            )?;
        }
        xml.push_str("</w:numbering>");
        Ok(xml)
    }
}
