//! Numbering levels for list nodes.
//!
//! Every top-level list gets its own numbering definition. Levels are
//! registered the first time a nesting depth is met; later lists at the same
//! depth inside the same definition reuse the registered level.
use log::debug;

use crate::common::unit::mm_to_twip;
use crate::ooxml::docx::writer::{NumberFormat, NumberingDefinition, NumberingLevel};

/// Left offset of the first level in the default style.
const BASE_INDENT_MM: f64 = 17.5;
/// Extra left offset per visual level.
const STEP_INDENT_MM: f64 = 5.0;
/// Hanging indent of the label in the default style.
const HANGING_MM: f64 = 5.0;
/// First-line indent of alternate-style items.
const ALTERNATE_FIRST_LINE_MM: f64 = 12.5;
/// Bullet glyph (figure dash).
const BULLET: &str = "\u{2012}";

/// Shape of one list level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyle {
    pub ordered: bool,
    pub alternate: bool,
    pub start: u32,
}

/// Visual indent of a new level.
///
/// Starts at the nesting depth and drops by one for every pair of adjacent
/// registered levels that both use `format`, so runs of same-kind levels do
/// not keep stepping to the right. Only levels sharing the new level's format
/// count; a run of the other kind leaves the indent alone.
pub fn visual_indent(registered: &[NumberingLevel], level: u32, format: NumberFormat) -> u32 {
    let shared = registered
        .windows(2)
        .filter(|pair| pair[0].format == format && pair[1].format == format)
        .count() as u32;
    level.saturating_sub(shared)
}

/// Build the numbering level for depth `level`.
pub fn build_level(registered: &[NumberingLevel], level: u32, style: LevelStyle) -> NumberingLevel {
    let format = if style.ordered {
        NumberFormat::Decimal
    } else {
        NumberFormat::Bullet
    };
    let indent = visual_indent(registered, level, format) as f64;
    let text = match (style.ordered, style.alternate) {
        (true, true) => format!("%{}.", level + 1),
        (true, false) => format!("%{})", level + 1),
        (false, _) => BULLET.to_string(),
    };
    let (left, first_line) = if style.alternate {
        (STEP_INDENT_MM * indent, ALTERNATE_FIRST_LINE_MM)
    } else {
        (BASE_INDENT_MM + STEP_INDENT_MM * indent, -HANGING_MM)
    };
    NumberingLevel {
        level,
        format,
        text,
        start: style.start,
        indent_left: mm_to_twip(left),
        indent_first_line: mm_to_twip(first_line),
    }
}

/// Register depth `level` once per definition.
pub fn register_level(definition: &mut NumberingDefinition, level: u32, style: LevelStyle) {
    if definition.has_level(level) {
        return;
    }
    let built = build_level(definition.levels(), level, style);
    debug!(
        "numbering level {} registered: {:?} {:?}, left {} twips",
        level, built.format, built.text, built.indent_left
    );
    definition.add_level(built);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERED: LevelStyle = LevelStyle {
        ordered: true,
        alternate: false,
        start: 1,
    };
    const BULLETED: LevelStyle = LevelStyle {
        ordered: false,
        alternate: false,
        start: 1,
    };

    #[test]
    fn test_default_ordered_level() {
        let level = build_level(&[], 0, ORDERED);
        assert_eq!(level.text, "%1)");
        assert_eq!(level.indent_left, mm_to_twip(17.5));
        assert_eq!(level.indent_first_line, -mm_to_twip(5.0));
    }

    #[test]
    fn test_alternate_level() {
        let style = LevelStyle {
            alternate: true,
            ..ORDERED
        };
        let level = build_level(&[], 0, style);
        assert_eq!(level.text, "%1.");
        assert_eq!(level.indent_left, 0);
        assert_eq!(level.indent_first_line, mm_to_twip(12.5));
    }

    #[test]
    fn test_bullet_glyph() {
        let level = build_level(&[], 1, BULLETED);
        assert_eq!(level.text, "\u{2012}");
        assert_eq!(level.format, NumberFormat::Bullet);
        assert_eq!(level.indent_left, mm_to_twip(22.5));
    }

    #[test]
    fn test_levels_registered_once() {
        let mut definition = NumberingDefinition::default();
        register_level(&mut definition, 0, ORDERED);
        register_level(&mut definition, 0, LevelStyle { start: 7, ..BULLETED });
        assert_eq!(definition.levels().len(), 1);
        assert_eq!(definition.levels()[0].start, 1);
        assert_eq!(definition.levels()[0].format, NumberFormat::Decimal);
    }

    #[test]
    fn test_same_kind_levels_stop_stepping() {
        let mut definition = NumberingDefinition::default();
        register_level(&mut definition, 0, ORDERED);
        register_level(&mut definition, 1, ORDERED);
        register_level(&mut definition, 2, ORDERED);
        let levels = definition.levels();
        assert_eq!(levels[1].indent_left, mm_to_twip(22.5));
        // Levels 0 and 1 are both ordered, so level 2 steps back by one.
        assert_eq!(levels[2].indent_left, mm_to_twip(22.5));
    }

    #[test]
    fn test_mixed_kinds_keep_stepping() {
        let mut definition = NumberingDefinition::default();
        register_level(&mut definition, 0, BULLETED);
        register_level(&mut definition, 1, ORDERED);
        register_level(&mut definition, 2, BULLETED);
        assert_eq!(definition.levels()[2].indent_left, mm_to_twip(27.5));
    }
}
