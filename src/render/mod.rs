//! Render glue: from a source file on disk to the finished report.
//!
//! The pipeline checks that its output files are not held open, compiles the
//! source into a temporary `.tmp.docx`, and then either renames it into place
//! or hands it to the external macro engine (which also exports PDF).
pub mod finish;
pub mod job;
pub mod lock;
pub mod paths;
pub mod progress;

pub use job::{JobGuard, JobState, RenderJob};
pub use lock::{ensure_unlocked, is_locked};
pub use paths::OutputPaths;
pub use progress::{NoProgress, Progress, Stage};

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::common::{Diagnostic, Result};
use crate::config::RenderOptions;
use crate::document::Document;
use crate::inline::{HueCursor, resolve_document};
use crate::serialize::{SerializeOptions, serialize_to_bytes};
use crate::{enrich, markup};

/// Result of a successful render.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// The DOCX or PDF that was written
    pub output: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// Whether the macro engine has to run.
pub fn needs_finishing(document: &Document, options: &RenderOptions) -> bool {
    options.macros.enabled && (options.render_pdf || document.has_code())
}

/// Renders source files one at a time.
#[derive(Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
    job: RenderJob,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            job: RenderJob::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.job.state() == JobState::Running
    }

    /// Render `source`; fails with `Error::Busy` while another render runs.
    pub async fn render(&self, source: &Path, progress: &mut dyn Progress) -> Result<RenderOutcome> {
        let _guard = self.job.try_start()?;
        render_file(source, &self.options, progress).await
    }
}

/// Render one source file without the job slot.
pub async fn render_file(
    source: &Path,
    options: &RenderOptions,
    progress: &mut dyn Progress,
) -> Result<RenderOutcome> {
    let paths = OutputPaths::for_source(source)?;
    ensure_unlocked(&paths.temp)?;
    ensure_unlocked(&paths.docx)?;

    progress.report(Stage::Parsing);
    if !source.is_file() {
        return Err(crate::Error::MissingFile(source.to_path_buf()));
    }
    let text = tokio::fs::read_to_string(source).await?;
    let parsed = markup::parse(&text)?;
    let mut diagnostics = parsed.diagnostics;
    let mut document = parsed.document;

    progress.report(Stage::Enriching);
    diagnostics.extend(enrich::enrich(&mut document));
    for diagnostic in &diagnostics {
        warn!("{diagnostic}");
    }
    let finishing = needs_finishing(&document, options);
    if options.render_pdf && !options.macros.enabled {
        warn!("PDF export needs the macro engine, writing DOCX only");
    }

    progress.report(Stage::Writing);
    let runic = resolve_document(document, &mut HueCursor::new());
    let serialize_options =
        SerializeOptions::new(&paths.dir).with_edit_minutes(options.edit_minutes);
    let bytes = serialize_to_bytes(&runic, &serialize_options)?;
    tokio::fs::write(&paths.temp, bytes).await?;

    if !finishing {
        tokio::fs::rename(&paths.temp, &paths.docx).await?;
        info!("rendered {}", paths.docx.display());
        return Ok(RenderOutcome {
            output: paths.docx,
            diagnostics,
        });
    }

    progress.report(Stage::Macros);
    let render_pdf = options.render_pdf;
    if render_pdf {
        remove_dir_if_exists(&paths.pdf_parts).await?;
    }
    let result = finish::run_macros(
        options,
        &paths.dir,
        &paths.temp,
        &paths.docx,
        render_pdf,
        progress,
    )
    .await;
    if let Err(e) = tokio::fs::remove_file(&paths.temp).await {
        warn!("cannot remove {}: {e}", paths.temp.display());
    }
    result?;

    if !render_pdf {
        info!("rendered {}", paths.docx.display());
        return Ok(RenderOutcome {
            output: paths.docx,
            diagnostics,
        });
    }

    progress.report(Stage::Merging);
    let parts = finish::pdf_parts(&paths.pdf_parts)?;
    finish::merge_pdfs(options, &parts, &paths.pdf).await?;
    remove_dir_if_exists(&paths.pdf_parts).await?;
    info!("rendered {}", paths.pdf.display());
    Ok(RenderOutcome {
        output: paths.pdf,
        diagnostics,
    })
}

async fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn plain_options() -> RenderOptions {
        RenderOptions::default().with_macros(false)
    }

    #[tokio::test]
    async fn test_render_docx() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("report.g.md");
        std::fs::write(&source, "# Введение\nТекст отчета.\n").unwrap();

        let mut stages = Vec::new();
        let mut sink = |stage: Stage| stages.push(stage);
        let outcome = render_file(&source, &plain_options(), &mut sink).await.unwrap();

        assert_eq!(outcome.output, dir.path().join("report.docx"));
        assert!(outcome.output.is_file());
        assert!(!dir.path().join("report.tmp.docx").exists());
        assert_eq!(stages, vec![Stage::Parsing, Stage::Enriching, Stage::Writing]);
        let bytes = std::fs::read(&outcome.output).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_diagnostics_are_returned() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.md");
        std::fs::write(&source, "!!rule nonsense\nТекст\n").unwrap();
        let outcome = render_file(&source, &plain_options(), &mut NoProgress).await.unwrap();
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_file(&dir.path().join("absent.md"), &plain_options(), &mut NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }

    #[tokio::test]
    async fn test_failed_macros_clean_up() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("code.md");
        std::fs::write(&source, "```rust main\nfn main() {}\n```\n").unwrap();
        let mut options = RenderOptions::default();
        options.macros.program = "md2gost-no-such-program".to_string();

        let err = render_file(&source, &options, &mut NoProgress).await.unwrap_err();
        assert!(matches!(err, Error::ExternalStage(_)));
        assert!(!dir.path().join("code.tmp.docx").exists());
        assert!(!dir.path().join("code.docx").exists());
    }

    #[tokio::test]
    async fn test_renderer_slot() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.md");
        std::fs::write(&source, "Текст\n").unwrap();
        let renderer = Renderer::new(plain_options());
        assert!(!renderer.is_running());
        renderer.render(&source, &mut NoProgress).await.unwrap();
        assert!(!renderer.is_running());

        let _held = renderer.job.try_start().unwrap();
        let err = renderer.render(&source, &mut NoProgress).await.unwrap_err();
        assert!(matches!(err, Error::Busy));
    }

    #[test]
    fn test_needs_finishing() {
        let mut document = markup::parse("```rust\nfn main() {}\n```").unwrap().document;
        assert!(needs_finishing(&document, &RenderOptions::default()));
        assert!(!needs_finishing(&document, &plain_options()));
        document.sections[0].nodes.clear();
        assert!(!needs_finishing(&document, &RenderOptions::default()));
        assert!(needs_finishing(&document, &RenderOptions::default().with_render_pdf(true)));
    }
}
