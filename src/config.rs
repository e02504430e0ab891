//! Render configuration loaded from `md2gost.yaml`.
//!
//! Every field has a default, so an absent file or a partial file both work.
//!
//! ```rust
//! use md2gost::config::RenderOptions;
//!
//! let options = RenderOptions::from_yaml("render_pdf: true\nmacros:\n  enabled: false\n").unwrap();
//! assert!(options.render_pdf);
//! assert!(!options.macros.enabled);
//! assert_eq!(options.merge.program, "pdfunite");
//! ```
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::common::Result;

/// File name looked up next to the source file.
pub const CONFIG_FILE_NAME: &str = "md2gost.yaml";

/// Options of one render invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Directory holding the macro script and Word templates
    pub assets: PathBuf,
    /// Produce a PDF in addition to the Word document
    pub render_pdf: bool,
    pub macros: MacroOptions,
    pub merge: MergeOptions,
    /// Editing time written into the document properties
    pub edit_minutes: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("assets"),
            render_pdf: false,
            macros: MacroOptions::default(),
            merge: MergeOptions::default(),
            edit_minutes: 0,
        }
    }
}

/// External macro engine used for finishing touches and PDF export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MacroOptions {
    pub enabled: bool,
    /// Interpreter that runs the script
    pub program: String,
    /// Script path, relative to `assets`
    pub script: PathBuf,
    /// Document template, relative to `assets`
    pub template: PathBuf,
    /// Macro-enabled template, relative to `assets`
    pub macro_template: PathBuf,
}

impl Default for MacroOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "powershell".to_string(),
            script: PathBuf::from("run.ps1"),
            template: PathBuf::from("template.dotx"),
            macro_template: PathBuf::from("template.dotm"),
        }
    }
}

/// Program that joins per-part PDF files into one.
///
/// It is called as `program args... <inputs...> <output>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            program: "pdfunite".to_string(),
            args: Vec::new(),
        }
    }
}

impl RenderOptions {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_saphyr::from_str(text)?)
    }

    /// Load options from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading render options from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Load `md2gost.yaml` from `dir`, falling back to defaults when absent.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    #[inline]
    pub fn with_render_pdf(mut self, render_pdf: bool) -> Self {
        self.render_pdf = render_pdf;
        self
    }

    #[inline]
    pub fn with_macros(mut self, enabled: bool) -> Self {
        self.macros.enabled = enabled;
        self
    }

    /// Full paths of the script and both templates.
    pub fn macro_paths(&self) -> (PathBuf, PathBuf, PathBuf) {
        (
            self.assets.join(&self.macros.script),
            self.assets.join(&self.macros.template),
            self.assets.join(&self.macros.macro_template),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert!(!options.render_pdf);
        assert!(options.macros.enabled);
        assert_eq!(options.macros.program, "powershell");
        let (script, template, macro_template) = options.macro_paths();
        assert_eq!(script, PathBuf::from("assets").join("run.ps1"));
        assert_eq!(template, PathBuf::from("assets").join("template.dotx"));
        assert_eq!(macro_template, PathBuf::from("assets").join("template.dotm"));
    }

    #[test]
    fn test_partial_yaml() {
        let options = RenderOptions::from_yaml(
            "assets: /opt/md2gost\nedit_minutes: 42\nmerge:\n  program: qpdf\n  args: [--empty, --pages]\n",
        )
        .unwrap();
        assert_eq!(options.assets, PathBuf::from("/opt/md2gost"));
        assert_eq!(options.edit_minutes, 42);
        assert_eq!(options.merge.program, "qpdf");
        assert_eq!(options.merge.args, vec!["--empty", "--pages"]);
        assert_eq!(options.macros.script, PathBuf::from("run.ps1"));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!RenderOptions::discover(dir.path()).unwrap().render_pdf);
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "render_pdf: true\n").unwrap();
        assert!(RenderOptions::discover(dir.path()).unwrap().render_pdf);
    }

    #[test]
    fn test_bad_yaml() {
        let err = RenderOptions::from_yaml("render_pdf: [oops").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
