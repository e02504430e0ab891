/// Relationship allocation for `word/document.xml`.
///
/// Relationship IDs are handed out while the body XML is generated, so a
/// hyperlink, image or footer gets its ID at the point where its reference is
/// written. The collected list then becomes `word/_rels/document.xml.rels`.
use std::fmt::Write as FmtWrite;

use crate::ooxml::docx::format::ImageFormat;
use crate::ooxml::error::Result;
use crate::ooxml::xml::{XML_DECLARATION, escape_xml};

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// What a relationship points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RelationshipKind {
    Styles,
    Numbering,
    Settings,
    Footer,
    Image,
    Hyperlink,
}

impl RelationshipKind {
    fn type_uri(&self) -> String {
        let name = match self {
            Self::Styles => "styles",
            Self::Numbering => "numbering",
            Self::Settings => "settings",
            Self::Footer => "footer",
            Self::Image => "image",
            Self::Hyperlink => "hyperlink",
        };
        format!("{REL_BASE}/{name}")
    }
}

/// One entry of the relationships part.
#[derive(Debug, Clone)]
pub(crate) struct Relationship {
    pub(crate) id: String,
    pub(crate) kind: RelationshipKind,
    pub(crate) target: String,
}

/// Image bytes collected while writing the body, in `media/imageN` order.
#[derive(Debug)]
pub(crate) struct MediaPart<'a> {
    pub(crate) name: String,
    pub(crate) data: &'a [u8],
    pub(crate) format: ImageFormat,
}

/// Allocates relationship IDs for the main document part.
#[derive(Debug)]
pub(crate) struct RelationshipMapper {
    relationships: Vec<Relationship>,
}

impl RelationshipMapper {
    /// Mapper pre-seeded with the styles, numbering and settings parts.
    pub(crate) fn new() -> Self {
        let mut mapper = Self {
            relationships: Vec::new(),
        };
        mapper.add(RelationshipKind::Styles, "styles.xml");
        mapper.add(RelationshipKind::Numbering, "numbering.xml");
        mapper.add(RelationshipKind::Settings, "settings.xml");
        mapper
    }

    pub(crate) fn add(&mut self, kind: RelationshipKind, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.relationships.len() + 1);
        self.relationships.push(Relationship {
            id: id.clone(),
            kind,
            target: target.into(),
        });
        id
    }

    /// Every hyperlink gets its own relationship, even for repeated URLs.
    pub(crate) fn add_hyperlink(&mut self, url: &str) -> String {
        self.add(RelationshipKind::Hyperlink, url)
    }

    pub(crate) fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.relationships.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
        for rel in &self.relationships {
            write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                rel.id,
                rel.kind.type_uri(),
                escape_xml(&rel.target)
            )?;
            if rel.kind == RelationshipKind::Hyperlink {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        Ok(xml)
    }
}

/// Mutable state threaded through body XML generation.
#[derive(Debug)]
pub(crate) struct PartContext<'a> {
    pub(crate) rels: RelationshipMapper,
    pub(crate) media: Vec<MediaPart<'a>>,
    next_drawing_id: u32,
}

impl<'a> PartContext<'a> {
    pub(crate) fn new() -> Self {
        Self {
            rels: RelationshipMapper::new(),
            media: Vec::new(),
            next_drawing_id: 1,
        }
    }

    /// Register an image part; returns its relationship ID.
    pub(crate) fn add_image(&mut self, data: &'a [u8], format: ImageFormat) -> String {
        let name = format!("image{}.{}", self.media.len() + 1, format.extension());
        let id = self
            .rels
            .add(RelationshipKind::Image, format!("media/{name}"));
        self.media.push(MediaPart { name, data, format });
        id
    }

    /// Unique `wp:docPr` id.
    pub(crate) fn next_drawing_id(&mut self) -> u32 {
        let id = self.next_drawing_id;
        self.next_drawing_id += 1;
        id
    }
}
