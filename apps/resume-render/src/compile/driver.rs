//! Two-pass pdflatex run inside a scoped temporary workspace.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{CompiledDocument, DocumentCompiler};
use crate::config::Config;
use crate::errors::RenderError;

const SOURCE_FILE: &str = "resume.tex";
const PDF_FILE: &str = "resume.pdf";
const LOG_FILE: &str = "resume.log";

/// Log lines that pinpoint the failure, checked in this order.
const LOG_MARKERS: &[&str] = &[
    "! LaTeX Error:",
    "! Undefined control sequence",
    "! Missing",
    "! Too many",
];

const EXCERPT_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// LatexCompiler
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LatexCompiler {
    engine: String,
    timeout: Duration,
    workspace_root: Option<PathBuf>,
}

impl LatexCompiler {
    pub fn new(engine: impl Into<String>, timeout: Duration) -> Self {
        LatexCompiler {
            engine: engine.into(),
            timeout,
            workspace_root: None,
        }
    }

    /// Create workspaces under `root` instead of the system temp dir.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let compiler = LatexCompiler::new(config.latex_engine.clone(), config.compile_timeout);
        match &config.workspace_root {
            Some(root) => compiler.with_workspace_root(root.clone()),
            None => compiler,
        }
    }

    fn workspace(&self) -> Result<tempfile::TempDir, RenderError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("resume-render-");
        let dir = match &self.workspace_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    async fn run_pass(&self, workspace: &Path, pass: u8) -> Result<Output, RenderError> {
        let mut cmd = Command::new(&self.engine);
        cmd.arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg(format!("-output-directory={}", workspace.display()))
            .arg(SOURCE_FILE)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(engine = %self.engine, pass, "Running typesetting pass");

        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => Err(RenderError::EngineTimeout {
                binary: self.engine.clone(),
                seconds: self.timeout.as_secs(),
            }),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RenderError::EngineNotFound {
                    binary: self.engine.clone(),
                })
            }
            Ok(Err(e)) => Err(e.into()),
            Ok(Ok(output)) => Ok(output),
        }
    }
}

#[async_trait]
impl DocumentCompiler for LatexCompiler {
    async fn compile(&self, source: &str) -> Result<CompiledDocument, RenderError> {
        // Dropped on every return path, which removes the directory.
        let workspace = self.workspace()?;
        let ws = workspace.path();

        tokio::fs::write(ws.join(SOURCE_FILE), source).await?;

        let first = self.run_pass(ws, 1).await?;
        if !first.status.success() {
            warn!(
                status = ?first.status.code(),
                "First typesetting pass exited non-zero; continuing with second pass"
            );
        }

        let second = self.run_pass(ws, 2).await?;
        let engine_log = match tokio::fs::read(ws.join(LOG_FILE)).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::new(),
        };

        if !second.status.success() {
            return Err(RenderError::CompilationFailure {
                excerpt: diagnostic_excerpt(&engine_log, &second),
            });
        }

        let pdf_path = ws.join(PDF_FILE);
        let pdf_bytes = match tokio::fs::read(&pdf_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::MissingOutputArtifact { path: pdf_path });
            }
            Err(e) => return Err(e.into()),
        };

        debug!(bytes = pdf_bytes.len(), "Compilation succeeded");
        Ok(CompiledDocument {
            pdf_bytes,
            engine_log,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// The first known error marker in the log, flattened to one line; otherwise
/// whatever the engine printed.
fn diagnostic_excerpt(log: &str, output: &Output) -> String {
    for marker in LOG_MARKERS {
        if let Some(pos) = log.find(marker) {
            return truncate_chars(&log[pos..], EXCERPT_CHARS).replace(['\r', '\n'], " ");
        }
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout)
    } else {
        stderr
    };
    truncate_chars(text.trim(), EXCERPT_CHARS).to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn output_with(stdout: &str, stderr: &str) -> Output {
        Output {
            status: std::process::ExitStatus::default(),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_excerpt_prefers_log_marker() {
        let log = "This is pdfTeX\n(./resume.tex\n! Undefined control sequence.\nl.12 \\foo\n";
        let excerpt = diagnostic_excerpt(log, &output_with("noise", "noise"));
        assert!(excerpt.starts_with("! Undefined control sequence."));
        assert!(!excerpt.contains('\n'));
    }

    #[test]
    fn test_excerpt_marker_order() {
        let log = "! Missing $ inserted.\n! LaTeX Error: File `x.sty' not found.";
        let excerpt = diagnostic_excerpt(log, &output_with("", ""));
        assert!(excerpt.starts_with("! LaTeX Error:"));
    }

    #[test]
    fn test_excerpt_falls_back_to_stderr_then_stdout() {
        assert_eq!(diagnostic_excerpt("", &output_with("out", "err")), "err");
        assert_eq!(diagnostic_excerpt("", &output_with("out", "  ")), "out");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long = "é".repeat(2_000);
        let excerpt = diagnostic_excerpt("", &output_with(&long, ""));
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_missing_engine_is_reported() {
        let root = tempfile::tempdir().expect("tempdir");
        let compiler = LatexCompiler::new("definitely-not-a-tex-engine", Duration::from_secs(5))
            .with_workspace_root(root.path());
        let err = compiler.compile("x").await.expect_err("should fail");
        assert!(matches!(err, RenderError::EngineNotFound { ref binary } if binary == "definitely-not-a-tex-engine"));
        assert_eq!(std::fs::read_dir(root.path()).expect("read root").count(), 0);
    }

    #[cfg(unix)]
    mod fake_engine {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        const SUCCEEDS: &str = r#"#!/bin/sh
for a in "$@"; do last="$a"; done
base="${last%.tex}"
printf '%%PDF-1.4 fake' > "$base.pdf"
echo "Output written on $base.pdf (1 page, 10 bytes)." > "$base.log"
exit 0
"#;

        const FAILS: &str = r#"#!/bin/sh
echo "! LaTeX Error: boom" > resume.log
echo "fatal" 1>&2
exit 1
"#;

        const NO_PDF: &str = "#!/bin/sh\nexit 0\n";

        const HANGS: &str = "#!/bin/sh\nexec sleep 30\n";

        fn install(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-engine.sh");
            std::fs::write(&path, body).expect("write script");
            let mut perms = std::fs::metadata(&path).expect("meta").permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).expect("chmod");
            path
        }

        fn setup(body: &str) -> (tempfile::TempDir, tempfile::TempDir, LatexCompiler) {
            let bin = tempfile::tempdir().expect("bin dir");
            let root = tempfile::tempdir().expect("workspace root");
            let script = install(bin.path(), body);
            let compiler = LatexCompiler::new(script.to_string_lossy(), Duration::from_secs(5))
                .with_workspace_root(root.path());
            (bin, root, compiler)
        }

        fn assert_clean(root: &Path) {
            assert_eq!(
                std::fs::read_dir(root).expect("read root").count(),
                0,
                "workspace was not removed"
            );
        }

        #[tokio::test]
        async fn test_successful_compile_returns_pdf_and_log() {
            let (_bin, root, compiler) = setup(SUCCEEDS);
            let doc = compiler.compile("\\documentclass{article}").await.expect("compiles");
            assert_eq!(doc.pdf_bytes, b"%PDF-1.4 fake");
            assert!(doc.engine_log.contains("(1 page"));
            assert_clean(root.path());
        }

        #[tokio::test]
        async fn test_failed_compile_carries_log_excerpt() {
            let (_bin, root, compiler) = setup(FAILS);
            let err = compiler.compile("x").await.expect_err("should fail");
            match err {
                RenderError::CompilationFailure { excerpt } => {
                    assert!(excerpt.starts_with("! LaTeX Error: boom"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert_clean(root.path());
        }

        #[tokio::test]
        async fn test_missing_pdf_is_reported() {
            let (_bin, root, compiler) = setup(NO_PDF);
            let err = compiler.compile("x").await.expect_err("should fail");
            assert!(matches!(err, RenderError::MissingOutputArtifact { .. }));
            assert_clean(root.path());
        }

        #[tokio::test]
        async fn test_hung_engine_times_out() {
            let bin = tempfile::tempdir().expect("bin dir");
            let root = tempfile::tempdir().expect("workspace root");
            let script = install(bin.path(), HANGS);
            let compiler = LatexCompiler::new(script.to_string_lossy(), Duration::from_millis(200))
                .with_workspace_root(root.path());
            let err = compiler.compile("x").await.expect_err("should time out");
            assert!(matches!(err, RenderError::EngineTimeout { .. }));
            assert_clean(root.path());
        }
    }
}
