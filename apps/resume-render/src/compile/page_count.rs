//! Best-effort page counting with tiered fallbacks.
//!
//! 1. `pdfinfo`'s `Pages:` line.
//! 2. The engine log's `Output written on ... (N pages` line.
//! 3. File size: anything over `LARGE_PDF_BYTES` is taken as two pages.
//! 4. Two pages, so the caller keeps trying to shrink.

use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{PageCount, PageCountSource, PageCounter};
use crate::config::Config;

/// Size above which a one-page resume PDF is implausible.
const LARGE_PDF_BYTES: u64 = 150_000;

const DEFAULT_PAGES: u32 = 2;

const PDFINFO_TIMEOUT: Duration = Duration::from_secs(10);

fn output_written_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Output written on .+?\.pdf \((\d+) pages?").expect("static regex is valid")
    })
}

// ────────────────────────────────────────────────────────────────────────────
// PdfInfoCounter
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PdfInfoCounter {
    binary: String,
}

impl PdfInfoCounter {
    pub fn new(binary: impl Into<String>) -> Self {
        PdfInfoCounter {
            binary: binary.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        PdfInfoCounter::new(config.pdfinfo_bin.clone())
    }

    async fn introspect(&self, pdf_path: &Path) -> Option<u32> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(pdf_path).stdin(Stdio::null()).kill_on_drop(true);

        let output = match tokio::time::timeout(PDFINFO_TIMEOUT, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!(binary = %self.binary, error = %e, "pdfinfo unavailable");
                return None;
            }
            Err(_) => {
                warn!(binary = %self.binary, "pdfinfo timed out");
                return None;
            }
        };
        if !output.status.success() {
            debug!(status = ?output.status.code(), "pdfinfo exited non-zero");
            return None;
        }
        parse_pdfinfo_pages(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl PageCounter for PdfInfoCounter {
    async fn count_pages(&self, pdf_path: &Path, engine_log: &str) -> PageCount {
        if let Some(pages) = self.introspect(pdf_path).await {
            return PageCount {
                pages,
                source: PageCountSource::Introspection,
            };
        }
        fallback_count(pdf_path, engine_log).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback tiers
// ────────────────────────────────────────────────────────────────────────────

/// Tiers 2 to 4, for when no introspection tool answered.
pub async fn fallback_count(pdf_path: &Path, engine_log: &str) -> PageCount {
    if let Some(pages) = parse_engine_log_pages(engine_log) {
        warn!(pages, "Page count taken from engine log; install pdfinfo for exact counts");
        return PageCount {
            pages,
            source: PageCountSource::EngineLog,
        };
    }

    if let Ok(meta) = tokio::fs::metadata(pdf_path).await {
        if meta.len() > 0 {
            let pages = if meta.len() > LARGE_PDF_BYTES { 2 } else { 1 };
            warn!(
                bytes = meta.len(),
                pages, "Page count estimated from file size; result may be wrong"
            );
            return PageCount {
                pages,
                source: PageCountSource::SizeHeuristic,
            };
        }
    }

    warn!("Could not determine page count; assuming {DEFAULT_PAGES}");
    PageCount {
        pages: DEFAULT_PAGES,
        source: PageCountSource::Default,
    }
}

/// Reads the count from a `Pages:          3` line.
pub fn parse_pdfinfo_pages(stdout: &str) -> Option<u32> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}

pub fn parse_engine_log_pages(log: &str) -> Option<u32> {
    output_written_pattern()
        .captures(log)
        .and_then(|caps| caps[1].parse().ok())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
