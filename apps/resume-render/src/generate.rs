//! Resume Generation: the end-to-end pipeline behind one CLI invocation.
//!
//! Flow: resolve template → normalize → render sections → allocate output paths →
//!       save JSON copy → page-fit loop → report.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::compile::{DocumentCompiler, PageCounter};
use crate::errors::RenderError;
use crate::fit::{run_page_fit, FitContext, FitObserver, FitOptions, FitReport};
use crate::output;
use crate::templates::TemplateRegistry;

/// One generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub template: String,
    pub output_dir: PathBuf,
    /// File stem; the allocator appends a sequence number.
    pub base_name: String,
    pub save_json: bool,
    pub fit: FitOptions,
}

/// Long-lived collaborators shared across requests.
pub struct Renderer<'a> {
    pub registry: &'a TemplateRegistry,
    pub compiler: &'a dyn DocumentCompiler,
    pub counter: &'a dyn PageCounter,
    pub observer: &'a dyn FitObserver,
}

impl Renderer<'_> {
    /// Runs the full pipeline for `raw`. Each call gets its own request id span.
    pub async fn generate(
        &self,
        raw: &Value,
        request: &GenerateRequest,
    ) -> Result<FitReport, RenderError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("generate", %request_id, template = %request.template);
        self.generate_inner(raw, request).instrument(span).await
    }

    async fn generate_inner(
        &self,
        raw: &Value,
        request: &GenerateRequest,
    ) -> Result<FitReport, RenderError> {
        // Step 1: template lookup and option checks fail fast, before anything touches disk.
        let template = self.registry.resolve(&request.template)?;
        request.fit.validate()?;

        // Step 2: normalize and render once; only assembly repeats per attempt.
        let record = template.normalize(raw);
        let fragments = template.render_sections(&record);
        info!(sections = fragments.len(), "Rendered sections");

        // Step 3: reserve artifact paths.
        let paths = output::allocate(&request.output_dir, &request.base_name).await?;
        info!(tex = %paths.tex.display(), "Allocated output paths");

        if request.save_json {
            output::save_json_copy(&paths, raw).await?;
        }

        // Step 4: compile / measure / adjust.
        let ctx = FitContext {
            template,
            compiler: self.compiler,
            counter: self.counter,
            observer: self.observer,
        };
        run_page_fit(&ctx, &fragments, &request.fit, &paths).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::compile::{CompiledDocument, PageCount, PageCountSource};
    use crate::fit::{FitVerdict, TracingObserver};

    struct StubCompiler;

    #[async_trait]
    impl DocumentCompiler for StubCompiler {
        async fn compile(&self, _source: &str) -> Result<CompiledDocument, RenderError> {
            Ok(CompiledDocument {
                pdf_bytes: b"%PDF-1.4".to_vec(),
                engine_log: String::new(),
            })
        }
    }

    struct OnePage;

    #[async_trait]
    impl PageCounter for OnePage {
        async fn count_pages(&self, _pdf_path: &Path, _engine_log: &str) -> PageCount {
            PageCount {
                pages: 1,
                source: PageCountSource::Introspection,
            }
        }
    }

    fn request(dir: &Path, template: &str, save_json: bool) -> GenerateRequest {
        GenerateRequest {
            template: template.to_string(),
            output_dir: dir.to_path_buf(),
            base_name: "resume".to_string(),
            save_json,
            fit: FitOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_generate_writes_all_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = TemplateRegistry::builtin();
        let renderer = Renderer {
            registry: &registry,
            compiler: &StubCompiler,
            counter: &OnePage,
            observer: &TracingObserver,
        };

        let raw = json!({"name": "Ada", "summary": "Engineer"});
        let report = renderer
            .generate(&raw, &request(dir.path(), "classic", true))
            .await
            .expect("generate");

        assert_eq!(report.verdict, FitVerdict::SinglePage);
        assert!(dir.path().join("resume1.tex").exists());
        assert!(dir.path().join("resume1.pdf").exists());
        assert!(dir.path().join("resume1.json").exists());
    }

    #[tokio::test]
    async fn test_unknown_template_touches_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = TemplateRegistry::builtin();
        let renderer = Renderer {
            registry: &registry,
            compiler: &StubCompiler,
            counter: &OnePage,
            observer: &TracingObserver,
        };

        let err = renderer
            .generate(&json!({}), &request(dir.path(), "nope", false))
            .await
            .expect_err("unknown template");
        assert_eq!(err.code(), "UNRESOLVABLE_TEMPLATE");
        assert_eq!(std::fs::read_dir(dir.path()).expect("read").count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_fit_options_touch_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = TemplateRegistry::builtin();
        let renderer = Renderer {
            registry: &registry,
            compiler: &StubCompiler,
            counter: &OnePage,
            observer: &TracingObserver,
        };

        let mut req = request(dir.path(), "classic", true);
        req.fit.requested_page_height = Some(0.5);
        let err = renderer
            .generate(&json!({"name": "Ada"}), &req)
            .await
            .expect_err("invalid height");
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(std::fs::read_dir(dir.path()).expect("read").count(), 0);
    }
}
