//! Output Allocator: numbered artifact paths that never clobber earlier runs.
//!
//! A run owns `<dir>/<base><n>.tex`, `.pdf` and `.json`. The `.tex` file is
//! reserved with `create_new`, so two concurrent runs with the same base name
//! always end up with different `n`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs::OpenOptions;
use tracing::debug;

use crate::errors::RenderError;

/// Upper bound on the sequence search for one base name.
const MAX_SEQUENCE: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub tex: PathBuf,
    pub pdf: PathBuf,
    pub json: PathBuf,
    pub sequence: u32,
}

impl OutputPaths {
    fn numbered(dir: &Path, base: &str, sequence: u32) -> Self {
        let stem = format!("{base}{sequence}");
        OutputPaths {
            tex: dir.join(format!("{stem}.tex")),
            pdf: dir.join(format!("{stem}.pdf")),
            json: dir.join(format!("{stem}.json")),
            sequence,
        }
    }
}

/// Reserves the lowest free sequence number for `base` inside `dir`, creating
/// `dir` if needed. A number is free when neither its `.tex` nor its `.pdf`
/// exists.
pub async fn allocate(dir: &Path, base: &str) -> Result<OutputPaths, RenderError> {
    let base = base.trim();
    if base.is_empty() || base.contains(['/', '\\']) {
        return Err(RenderError::InvalidInput(format!(
            "output base name '{base}' must be a plain file name"
        )));
    }
    tokio::fs::create_dir_all(dir).await?;

    for sequence in 1..=MAX_SEQUENCE {
        let paths = OutputPaths::numbered(dir, base, sequence);
        if tokio::fs::try_exists(&paths.pdf).await? {
            continue;
        }
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&paths.tex)
            .await
        {
            Ok(_) => {
                debug!(tex = %paths.tex.display(), "Reserved output paths");
                return Ok(paths);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(RenderError::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free output slot for '{base}' in {}", dir.display()),
    )))
}

/// Overwrites the run's `.tex` with the source about to be compiled.
pub async fn write_source(paths: &OutputPaths, source: &str) -> Result<(), RenderError> {
    tokio::fs::write(&paths.tex, source).await?;
    Ok(())
}

/// Overwrites the run's `.pdf` with the latest successful attempt.
pub async fn write_pdf(paths: &OutputPaths, pdf: &[u8]) -> Result<(), RenderError> {
    tokio::fs::write(&paths.pdf, pdf).await?;
    Ok(())
}

/// Writes the raw input next to the artifacts, pretty-printed.
pub async fn save_json_copy(paths: &OutputPaths, raw: &Value) -> Result<(), RenderError> {
    let body = serde_json::to_vec_pretty(raw)?;
    tokio::fs::write(&paths.json, body).await?;
    Ok(())
}
