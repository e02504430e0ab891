//! External finishing stage: the macro engine and the PDF merge program.
use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use super::progress::{Progress, Stage};
use crate::common::{Error, Result};
use crate::config::RenderOptions;

/// Arguments passed to the macro engine script.
pub fn macro_args(
    options: &RenderOptions,
    input: &Path,
    output: &Path,
    render_pdf: bool,
) -> Vec<String> {
    let (script, template, macro_template) = options.macro_paths();
    let mut args: Vec<String> = vec![
        "-NoProfile".into(),
        "-ExecutionPolicy".into(),
        "Bypass".into(),
        "-File".into(),
        script.display().to_string(),
        "-InputDoc".into(),
        input.display().to_string(),
        "-OutputDoc".into(),
        output.display().to_string(),
        "-MacroTemplate".into(),
        macro_template.display().to_string(),
        "-Template".into(),
        template.display().to_string(),
    ];
    if render_pdf {
        args.push("-RenderPDF".into());
    }
    args
}

/// Run the macro engine on `input`, writing `output`.
///
/// Progress markers on the engine's standard output are forwarded to
/// `progress`; its standard error goes to the log.
pub async fn run_macros(
    options: &RenderOptions,
    cwd: &Path,
    input: &Path,
    output: &Path,
    render_pdf: bool,
    progress: &mut dyn Progress,
) -> Result<()> {
    let program = &options.macros.program;
    let args = macro_args(options, input, output, render_pdf);
    debug!("spawning {program} {}", args.join(" "));
    let mut child = Command::new(program)
        .args(&args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::ExternalStage(format!("cannot start {program}: {e}")))?;

    let stderr = child.stderr.take().map(|stderr| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!("macro engine: {line}");
            }
        })
    });

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            debug!("macro engine: {line}");
            if let Some(stage) = Stage::from_marker(&line) {
                progress.report(stage);
            }
        }
    }

    let status = child.wait().await?;
    if let Some(task) = stderr {
        let _ = task.await;
    }
    if !status.success() {
        return Err(Error::ExternalStage(format!("{program} exited with {status}")));
    }
    info!("macro engine finished {}", output.display());
    Ok(())
}

/// Part files of a PDF export, ordered by name.
pub fn pdf_parts(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::ExternalStage(format!(
            "PDF export produced no output folder {}",
            dir.display()
        )));
    }
    let mut parts = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    parts.retain(|p| p.is_file());
    parts.sort();
    Ok(parts)
}

/// Join `parts` into `output` with the configured merge program.
pub async fn merge_pdfs(options: &RenderOptions, parts: &[PathBuf], output: &Path) -> Result<()> {
    let program = &options.merge.program;
    debug!("merging {} PDF parts with {program}", parts.len());
    let status = Command::new(program)
        .args(&options.merge.args)
        .args(parts)
        .arg(output)
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|e| Error::ExternalStage(format!("cannot start {program}: {e}")))?;
    if !status.success() {
        return Err(Error::ExternalStage(format!("{program} exited with {status}")));
    }
    Ok(())
}
