/// Image support for DOCX documents.
use super::relmap::PartContext;
use crate::common::unit::px_to_emu;
use crate::ooxml::docx::format::ImageFormat;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::xml::escape_xml;
use std::fmt::Write as FmtWrite;

/// A mutable inline image in a document.
///
/// Inline images are embedded within paragraphs as part of runs.
#[derive(Debug, Clone)]
pub struct MutableInlineImage {
    pub(crate) data: Vec<u8>,
    pub(crate) format: ImageFormat,
    pub(crate) width_emu: i64,
    pub(crate) height_emu: i64,
    pub(crate) description: String,
}

impl MutableInlineImage {
    /// Create an inline image from bytes, sized in pixels.
    pub fn from_bytes(data: Vec<u8>, width_px: u32, height_px: u32) -> Result<Self> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| OoxmlError::InvalidFormat("Unknown image format".to_string()))?;

        Ok(Self {
            data,
            format,
            width_emu: px_to_emu(width_px),
            height_emu: px_to_emu(height_px),
            description: String::new(),
        })
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Extent in EMUs as `(cx, cy)`.
    pub fn extent(&self) -> (i64, i64) {
        (self.width_emu, self.height_emu)
    }

    pub(crate) fn to_xml<'a>(&'a self, xml: &mut String, ctx: &mut PartContext<'a>) -> Result<()> {
        let r_id = ctx.add_image(&self.data, self.format);
        let id = ctx.next_drawing_id();
        let (cx, cy) = self.extent();
        let desc = escape_xml(&self.description);

        write!(
            xml,
            r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:docPr id="{id}" name="Picture {id}" descr="{desc}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="Picture {id}" descr="{desc}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#
        )?;

        Ok(())
    }
}
