//! Unified error types for md2gost.
//!
//! This module provides a single error type covering parsing, serialization
//! and the render glue, so callers get one terminal outcome per render.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for md2gost operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source text could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Heading level outside 0-6
    #[error("Wrong heading level: {0}")]
    InvalidHeadingLevel(u8),

    /// Image file with an unsupported type
    #[error("Unsupported image format: \"{extension}\", file: {path}")]
    UnsupportedImage { extension: String, path: PathBuf },

    /// Referenced file does not exist
    #[error("File not found: {0}")]
    MissingFile(PathBuf),

    /// External document reference is not a Word document
    #[error("External document must be a .docx file: {0}")]
    InvalidExternalDoc(PathBuf),

    /// Word-processor writer error
    #[error("DOCX error: {0}")]
    Ooxml(String),

    /// Output path is open in another process
    #[error("Output file is busy or locked: {0}")]
    Locked(PathBuf),

    /// A render is already running
    #[error("Another render is already in progress")]
    Busy,

    /// External finishing stage failed
    #[error("External stage failed: {0}")]
    ExternalStage(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(String),
}

/// Result type for md2gost operations.
pub type Result<T> = std::result::Result<T, Error>;
