//! Output file names derived from the source path.
use std::path::{Path, PathBuf};

use crate::common::Result;

/// Suffix stripped from source stems: `report.g.md` renders to `report.docx`.
const SOURCE_MARKER: &str = ".g";
/// Folder the macro engine drops per-part PDF files into.
pub const PDF_PARTS_DIR: &str = ".md2gost_out";

/// Every path a render touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Directory of the source file; relative references resolve against it
    pub dir: PathBuf,
    pub stem: String,
    /// Serializer output before the finishing stage
    pub temp: PathBuf,
    pub docx: PathBuf,
    pub pdf: PathBuf,
    pub pdf_parts: PathBuf,
}

impl OutputPaths {
    pub fn for_source<P: AsRef<Path>>(source: P) -> Result<Self> {
        let source = std::path::absolute(source.as_ref())?;
        let dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = output_stem(&source);
        Ok(Self {
            temp: dir.join(format!("{stem}.tmp.docx")),
            docx: dir.join(format!("{stem}.docx")),
            pdf: dir.join(format!("{stem}.pdf")),
            pdf_parts: dir.join(PDF_PARTS_DIR),
            dir,
            stem,
        })
    }
}

/// File stem with every trailing `.g` removed.
pub fn output_stem(source: &Path) -> String {
    let mut stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    while let Some(trimmed) = stem.strip_suffix(SOURCE_MARKER) {
        stem.truncate(trimmed.len());
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_stripped() {
        assert_eq!(output_stem(Path::new("/w/report.g.md")), "report");
        assert_eq!(output_stem(Path::new("/w/report.g.g.md")), "report");
        assert_eq!(output_stem(Path::new("/w/report.md")), "report");
        assert_eq!(output_stem(Path::new("/w/good.md")), "good");
    }

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::for_source("/work/lab1.g.md").unwrap();
        assert_eq!(paths.dir, PathBuf::from("/work"));
        assert_eq!(paths.temp, PathBuf::from("/work/lab1.tmp.docx"));
        assert_eq!(paths.docx, PathBuf::from("/work/lab1.docx"));
        assert_eq!(paths.pdf, PathBuf::from("/work/lab1.pdf"));
        assert_eq!(paths.pdf_parts, PathBuf::from("/work/.md2gost_out"));
    }
}
