//! Shared formatting types for the DOCX writer.

/// Line spacing options for paragraphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSpacing {
    /// Single line spacing
    Single,
    /// Multiple line spacing (e.g., 1.25)
    Multiple(f64),
}

impl LineSpacing {
    /// Value of `w:line` in 240ths of a line.
    pub(crate) fn line_value(&self) -> u32 {
        match self {
            Self::Single => 240,
            Self::Multiple(factor) => (factor * 240.0).round() as u32,
        }
    }
}

/// Paragraph alignment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphAlignment {
    Left,
    Center,
    Right,
    Justify,
}

impl ParagraphAlignment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

/// Raster formats that can be embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Detect image format from byte signature.
    pub fn detect_from_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if data.starts_with(b"BM") {
            return Some(Self::Bmp);
        }
        None
    }

    /// Format for a file extension, case-insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_and_extension() {
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a......"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect_from_bytes(b"nothing"), None);
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("svg"), None);
    }

    #[test]
    fn test_line_spacing() {
        assert_eq!(LineSpacing::Single.line_value(), 240);
        assert_eq!(LineSpacing::Multiple(1.25).line_value(), 300);
    }
}
