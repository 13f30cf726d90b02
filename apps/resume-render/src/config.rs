use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process configuration loaded from environment variables.
/// Every variable has a default; CLI flags override per run.
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub data_dir: PathBuf,
    pub latex_engine: String,
    pub pdfinfo_bin: String,
    pub compile_timeout: Duration,
    /// Parent directory for compile workspaces. `None` uses the system temp dir.
    pub workspace_root: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("LATEX_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("LATEX_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            output_dir: env_or("RENDER_OUTPUT_DIR", "output").into(),
            data_dir: env_or("RENDER_DATA_DIR", "data").into(),
            latex_engine: env_or("LATEX_ENGINE", "pdflatex"),
            pdfinfo_bin: env_or("PDFINFO_BIN", "pdfinfo"),
            compile_timeout: Duration::from_secs(timeout_secs),
            workspace_root: std::env::var("RENDER_WORKSPACE_ROOT").ok().map(PathBuf::from),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
