use std::path::PathBuf;

use thiserror::Error;

/// Render-pipeline error type.
///
/// Only toolchain problems and unusable input files surface here. An incomplete
/// record is never an error: its missing sections are simply omitted.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown template '{name}' (available: {available})")]
    UnresolvableTemplate { name: String, available: String },

    #[error("LaTeX compilation failed: {excerpt}")]
    CompilationFailure { excerpt: String },

    #[error("Engine exited successfully but no PDF was found at {}", path.display())]
    MissingOutputArtifact { path: PathBuf },

    #[error("Typesetting engine '{binary}' was not found on PATH. Is a TeX distribution installed?")]
    EngineNotFound { binary: String },

    #[error("Typesetting engine '{binary}' timed out after {seconds}s")]
    EngineTimeout { binary: String, seconds: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Stable machine-readable code, printed by the CLI next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::UnresolvableTemplate { .. } => "UNRESOLVABLE_TEMPLATE",
            RenderError::CompilationFailure { .. } => "COMPILATION_FAILURE",
            RenderError::MissingOutputArtifact { .. } => "MISSING_OUTPUT_ARTIFACT",
            RenderError::EngineNotFound { .. } => "ENGINE_NOT_FOUND",
            RenderError::EngineTimeout { .. } => "ENGINE_TIMEOUT",
            RenderError::InvalidInput(_) => "INVALID_INPUT",
            RenderError::Io(_) => "IO_ERROR",
        }
    }

    /// True for failures caused by the document source itself rather than the toolchain.
    /// Retrying at another page height cannot fix these.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            RenderError::CompilationFailure { .. } | RenderError::MissingOutputArtifact { .. }
        )
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::InvalidInput(e.to_string())
    }
}
