//! Document metadata stored in the `docProps` parts.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::ooxml::xml::{XML_DECLARATION, escape_xml};

/// Document core and extended properties.
///
/// Core properties go to `docProps/core.xml`; the edit duration goes to
/// `docProps/app.xml` as `TotalTime`.
#[derive(Debug, Clone, Default)]
pub struct DocumentProperties {
    pub title: Option<String>,
    /// Document creator/author
    pub creator: Option<String>,
    pub last_modified_by: Option<String>,
    pub language: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    /// Total editing time in minutes
    pub edit_minutes: u64,
}

impl DocumentProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the creator; it is also recorded as the last editor.
    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self.last_modified_by = Some(creator.to_string());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Stamp both creation and modification time.
    pub fn timestamps(mut self, now: DateTime<Utc>) -> Self {
        self.created = Some(now);
        self.modified = Some(now);
        self
    }

    pub fn edit_minutes(mut self, minutes: u64) -> Self {
        self.edit_minutes = minutes;
        self
    }

    /// Generate core.xml content for this properties set.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);

        let elements = [
            ("dc:title", &self.title),
            ("dc:creator", &self.creator),
            ("cp:lastModifiedBy", &self.last_modified_by),
            ("dc:language", &self.language),
        ];
        for (tag, value) in elements {
            if let Some(value) = value {
                xml.push_str(&format!("<{tag}>{}</{tag}>", escape_xml(value)));
            }
        }

        let stamps = [("dcterms:created", &self.created), ("dcterms:modified", &self.modified)];
        for (tag, stamp) in stamps {
            if let Some(stamp) = stamp {
                xml.push_str(&format!(
                    r#"<{tag} xsi:type="dcterms:W3CDTF">{}</{tag}>"#,
                    stamp.to_rfc3339_opts(SecondsFormat::Secs, true)
                ));
            }
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }

    /// Generate app.xml content.
    pub fn to_app_xml(&self) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
        xml.push_str(&format!("<Application>md2gost</Application><TotalTime>{}</TotalTime>", self.edit_minutes));
        xml.push_str("</Properties>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_xml_generation() {
        let props = DocumentProperties::new().title("Отчет").creator("Иванов И.И.");
        let xml = props.to_xml();
        assert!(xml.contains("<dc:title>Отчет</dc:title>"));
        assert!(xml.contains("<dc:creator>Иванов И.И.</dc:creator>"));
        assert!(xml.contains("<cp:lastModifiedBy>Иванов И.И.</cp:lastModifiedBy>"));
        assert!(!xml.contains("dcterms:created"));
    }

    #[test]
    fn test_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let xml = DocumentProperties::new().timestamps(now).to_xml();
        assert!(xml.contains(r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T12:30:00Z</dcterms:created>"#));
        assert!(xml.contains("<dcterms:modified"));
    }

    #[test]
    fn test_xml_escaping() {
        let xml = DocumentProperties::new().title("A & <B>").to_xml();
        assert!(xml.contains("A &amp; &lt;B&gt;"));
    }

    #[test]
    fn test_total_time() {
        let xml = DocumentProperties::new().edit_minutes(42).to_app_xml();
        assert!(xml.contains("<TotalTime>42</TotalTime>"));
    }
}
