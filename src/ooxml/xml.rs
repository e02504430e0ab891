//! XML text helpers shared by the part writers.
use std::borrow::Cow;

/// Escape text for element content and attribute values.
#[inline]
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// XML declaration every part starts with.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Namespace attributes for WordprocessingML parts that reference
/// relationships and drawings.
pub const WORD_NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_xml("a & <b> \"c\""), "a &amp; &lt;b&gt; &quot;c&quot;");
        assert!(matches!(escape_xml("plain"), Cow::Borrowed(_)));
    }
}
