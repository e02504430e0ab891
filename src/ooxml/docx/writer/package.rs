/// OPC package (ZIP) output for DOCX documents.
///
/// Parts are deflated into the archive as they are added; the
/// `[Content_Types].xml` manifest is generated from the recorded part names
/// when the package is finished.
use crate::ooxml::docx::format::ImageFormat;
use crate::ooxml::error::Result;
use crate::ooxml::xml::{XML_DECLARATION, escape_xml};
use std::io::{Cursor, Seek, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

pub(crate) const MAIN_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub(crate) const STYLES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub(crate) const NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
pub(crate) const SETTINGS: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
pub(crate) const FOOTER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
pub(crate) const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub(crate) const EXTENDED_PROPERTIES: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";
const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// Package-level relationships (`_rels/.rels`).
const ROOT_RELS: &str = concat!(
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
    r#"</Relationships>"#
);

/// Writer for a WordprocessingML package.
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    overrides: Vec<(String, &'static str)>,
    image_formats: Vec<ImageFormat>,
}

impl PackageWriter<Cursor<Vec<u8>>> {
    /// Package written to memory.
    pub fn new() -> Self {
        Self::with_writer(Cursor::new(Vec::new()))
    }
}

impl<W: Write + Seek> PackageWriter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
            overrides: Vec::new(),
            image_formats: Vec::new(),
        }
    }

    fn write_entry(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(path, options)?;
        self.zip_writer.write_all(content)?;
        Ok(())
    }

    /// Add an XML part with an explicit content type.
    pub fn add_part(&mut self, path: &str, content_type: &'static str, content: &str) -> Result<()> {
        self.write_entry(path, content.as_bytes())?;
        self.overrides.push((format!("/{path}"), content_type));
        Ok(())
    }

    /// Add a relationships part; covered by the `rels` default.
    pub fn add_relationships(&mut self, path: &str, content: &str) -> Result<()> {
        self.write_entry(path, content.as_bytes())
    }

    /// Add a binary media part; covered by an extension default.
    pub fn add_media(&mut self, path: &str, format: ImageFormat, data: &[u8]) -> Result<()> {
        self.write_entry(path, data)?;
        if !self.image_formats.contains(&format) {
            self.image_formats.push(format);
        }
        Ok(())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.overrides.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        xml.push_str(&format!(r#"<Default Extension="rels" ContentType="{RELATIONSHIPS}"/>"#));
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        for format in &self.image_formats {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                format.extension(),
                format.mime_type()
            ));
        }
        for (part, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(part),
                content_type
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    /// Write the root relationships and content types, then close the archive.
    pub fn finish(mut self) -> Result<W> {
        let root_rels = format!("{XML_DECLARATION}{ROOT_RELS}");
        self.write_entry("_rels/.rels", root_rels.as_bytes())?;
        let content_types = self.content_types_xml();
        self.write_entry("[Content_Types].xml", content_types.as_bytes())?;
        Ok(self.zip_writer.finish()?)
    }
}

impl Default for PackageWriter<Cursor<Vec<u8>>> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_content_types() {
        let mut writer = PackageWriter::new();
        writer.add_part("word/document.xml", MAIN_DOCUMENT, "<w:document/>").unwrap();
        writer.add_media("word/media/image1.png", ImageFormat::Png, &[1, 2, 3]).unwrap();
        writer.add_media("word/media/image2.png", ImageFormat::Png, &[4]).unwrap();
        let xml = writer.content_types_xml();
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
        assert!(xml.contains(r#"<Override PartName="/word/document.xml""#));
    }

    #[test]
    fn test_archive_entries() {
        let mut writer = PackageWriter::new();
        writer.add_part("word/styles.xml", STYLES, "<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, ["[Content_Types].xml", "_rels/.rels", "word/styles.xml"]);

        let mut styles = String::new();
        archive.by_name("word/styles.xml").unwrap().read_to_string(&mut styles).unwrap();
        assert_eq!(styles, "<w:styles/>");
    }
}
