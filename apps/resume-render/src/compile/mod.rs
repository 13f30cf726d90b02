//! Compilation Driver and page-count measurement.
//!
//! Both external tools sit behind async traits so the page-fit loop can be driven
//! by mocks in tests. The real implementations shell out through `tokio::process`.

pub mod driver;
pub mod environment;
pub mod page_count;

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::RenderError;

pub use driver::LatexCompiler;
pub use environment::{check_environment, ToolStatus};
pub use page_count::PdfInfoCounter;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Everything worth keeping from a successful compile, read into memory before
/// the scratch workspace is removed.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    pub pdf_bytes: Vec<u8>,
    pub engine_log: String,
}

/// How a page count was obtained, from most to least trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCountSource {
    /// `pdfinfo` reported it.
    Introspection,
    /// Parsed from the engine's "Output written on" log line.
    EngineLog,
    /// Guessed from the PDF's size on disk.
    SizeHeuristic,
    /// Nothing worked; assumed overflowing.
    Default,
}

impl PageCountSource {
    /// Tiers below introspection are guesses and get logged as such.
    pub fn is_degraded(self) -> bool {
        !matches!(self, PageCountSource::Introspection)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCount {
    pub pages: u32,
    pub source: PageCountSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

/// Turns a complete LaTeX source into PDF bytes.
#[async_trait]
pub trait DocumentCompiler: Send + Sync {
    async fn compile(&self, source: &str) -> Result<CompiledDocument, RenderError>;
}

/// Measures how many pages a compiled PDF has. Never fails: when every
/// measurement is unavailable it falls back to a default count.
#[async_trait]
pub trait PageCounter: Send + Sync {
    async fn count_pages(&self, pdf_path: &Path, engine_log: &str) -> PageCount;
}
