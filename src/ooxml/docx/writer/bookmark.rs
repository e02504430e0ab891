/// Bookmark writer support for DOCX documents.
use crate::ooxml::error::Result;
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// Word rejects bookmark names longer than this.
const MAX_NAME_LEN: usize = 40;

/// Normalize a link anchor into a valid bookmark name.
///
/// Both the bookmark and every `w:anchor` pointing at it go through this
/// function, so they always agree.
pub fn bookmark_name(anchor: &str) -> String {
    let mut name: String = anchor
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(MAX_NAME_LEN)
        .collect();
    if !name.chars().next().is_some_and(char::is_alphabetic) {
        name.insert(0, 'b');
        name.truncate(
            name.char_indices()
                .nth(MAX_NAME_LEN)
                .map_or(name.len(), |(i, _)| i),
        );
    }
    name
}

/// A mutable bookmark in a Word document.
///
/// Bookmarks mark named locations in a document for quick navigation and cross-referencing.
#[derive(Debug, Clone)]
pub struct MutableBookmark {
    id: u32,
    name: String,
}

impl MutableBookmark {
    /// Create a bookmark for a link anchor.
    pub fn new(id: u32, anchor: &str) -> Self {
        Self {
            id,
            name: bookmark_name(anchor),
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn to_xml_start(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<w:bookmarkStart w:id="{}" w:name="{}"/>"#,
            self.id,
            escape_xml(&self.name)
        )?;
        Ok(())
    }

    pub(crate) fn to_xml_end(&self, xml: &mut String) -> Result<()> {
        write!(xml, r#"<w:bookmarkEnd w:id="{}"/>"#, self.id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_xml() {
        let bookmark = MutableBookmark::new(42, "intro");
        let mut xml = String::new();
        bookmark.to_xml_start(&mut xml).unwrap();
        bookmark.to_xml_end(&mut xml).unwrap();
        assert_eq!(
            xml,
            r#"<w:bookmarkStart w:id="42" w:name="intro"/><w:bookmarkEnd w:id="42"/>"#
        );
    }

    #[test]
    fn test_name_sanitizing() {
        assert_eq!(bookmark_name("fig-1"), "fig_1");
        assert_eq!(bookmark_name("1st"), "b1st");
        assert_eq!(bookmark_name("_x"), "b_x");
        assert_eq!(bookmark_name("рис.2"), "рис_2");
    }

    #[test]
    fn test_name_length_capped() {
        let long = "9".repeat(60);
        assert_eq!(bookmark_name(&long).chars().count(), MAX_NAME_LEN);
    }
}
