//! Toolchain availability check behind `--check-env`.

use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub tool: &'static str,
    pub binary: String,
    pub available: bool,
    /// First line the tool printed about itself.
    pub version: Option<String>,
    /// Whether rendering can proceed without it.
    pub required: bool,
}

/// Probes the typesetting engine and the page-count tool.
pub async fn check_environment(config: &Config) -> Vec<ToolStatus> {
    vec![
        probe("engine", &config.latex_engine, "--version", true).await,
        probe("pdfinfo", &config.pdfinfo_bin, "-v", false).await,
    ]
}

async fn probe(tool: &'static str, binary: &str, flag: &str, required: bool) -> ToolStatus {
    let mut cmd = Command::new(binary);
    cmd.arg(flag).stdin(Stdio::null()).kill_on_drop(true);

    // pdfinfo prints its version to stderr and may exit non-zero, so a successful
    // spawn is what counts.
    let version = match tokio::time::timeout(PROBE_TIMEOUT, cmd.output()).await {
        Ok(Ok(output)) => {
            let text = if output.stdout.is_empty() {
                output.stderr
            } else {
                output.stdout
            };
            Some(
                String::from_utf8_lossy(&text)
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .unwrap_or_default()
                    .to_string(),
            )
        }
        Ok(Err(e)) => {
            debug!(binary, error = %e, "Tool probe failed");
            None
        }
        Err(_) => {
            debug!(binary, "Tool probe timed out");
            None
        }
    };

    ToolStatus {
        tool,
        binary: binary.to_string(),
        available: version.is_some(),
        version: version.filter(|v| !v.is_empty()),
        required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let status = probe("engine", "definitely-not-a-binary", "--version", true).await;
        assert!(!status.available);
        assert!(status.version.is_none());
        assert!(status.required);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawnable_binary_is_available() {
        let status = probe("shell", "sh", "-c", false).await;
        // `sh -c` with no command string errors out but still spawns.
        assert!(status.available);
    }
}
