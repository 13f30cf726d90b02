//! Template Registry: static mapping from variant name to a renderer set.
//!
//! Variants share the normalizer and section renderers and differ only in page
//! geometry. Lookup is by exact name; unknown names report the available set.

use serde_json::Value;

use crate::errors::RenderError;
use crate::latex::{self, Fragment, PageGeometry};
use crate::models::ResumeRecord;
use crate::normalize;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// One resume variant: turns raw input into a full LaTeX document.
pub trait ResumeTemplate: Send + Sync {
    fn name(&self) -> &'static str;

    fn normalize(&self, raw: &Value) -> ResumeRecord {
        normalize::normalize(raw)
    }

    fn render_sections(&self, record: &ResumeRecord) -> Vec<Fragment> {
        latex::render_all(record)
    }

    fn assemble_document(&self, fragments: &[Fragment], page_height: Option<f64>) -> String;

    /// Convenience: normalize, render, and assemble in one call.
    fn render_document(&self, raw: &Value, page_height: Option<f64>) -> String {
        let record = self.normalize(raw);
        let fragments = self.render_sections(&record);
        self.assemble_document(&fragments, page_height)
    }
}

/// The built-in single-column layout, parametrized by font size.
#[derive(Debug, Clone, Copy)]
pub struct ClassicTemplate {
    name: &'static str,
    geometry: PageGeometry,
}

impl ClassicTemplate {
    pub const fn new(name: &'static str, font_size_pt: u8) -> Self {
        ClassicTemplate {
            name,
            geometry: PageGeometry {
                font_size_pt,
                margin_in: latex::document::MARGIN_IN,
            },
        }
    }
}

impl ResumeTemplate for ClassicTemplate {
    fn name(&self) -> &'static str {
        self.name
    }

    fn assemble_document(&self, fragments: &[Fragment], page_height: Option<f64>) -> String {
        latex::assemble(fragments, page_height, &self.geometry)
    }
}

static CLASSIC: ClassicTemplate = ClassicTemplate::new("classic", 11);
static COMPACT: ClassicTemplate = ClassicTemplate::new("compact", 10);

pub const DEFAULT_TEMPLATE: &str = "classic";

/// Name → template table, fixed at compile time.
pub struct TemplateRegistry {
    entries: Vec<&'static dyn ResumeTemplate>,
}

impl TemplateRegistry {
    pub fn builtin() -> Self {
        TemplateRegistry {
            entries: vec![&CLASSIC as &dyn ResumeTemplate, &COMPACT],
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|t| t.name()).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<&'static dyn ResumeTemplate, RenderError> {
        self.entries
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| RenderError::UnresolvableTemplate {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_names() {
        assert_eq!(TemplateRegistry::builtin().names(), vec!["classic", "compact"]);
    }

    #[test]
    fn test_resolve_known_template() {
        let registry = TemplateRegistry::builtin();
        let template = registry.resolve("compact").expect("compact exists");
        assert_eq!(template.name(), "compact");
        let doc = template.assemble_document(&[], None);
        assert!(doc.contains("10pt"));
    }

    #[test]
    fn test_unknown_template_lists_available() {
        let err = TemplateRegistry::builtin()
            .resolve("fancy")
            .err()
            .expect("should fail");
        match err {
            RenderError::UnresolvableTemplate { name, available } => {
                assert_eq!(name, "fancy");
                assert_eq!(available, "classic, compact");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_render_document_end_to_end() {
        let template = TemplateRegistry::builtin()
            .resolve(DEFAULT_TEMPLATE)
            .expect("classic");
        let doc = template.render_document(
            &json!({
                "name": "Ada Lovelace",
                "work_experience": [{"company": "Analytical Engines", "position": "Programmer"}]
            }),
            Some(12.0),
        );
        assert!(doc.contains("Ada Lovelace"));
        assert!(doc.contains(r"\section{Experience}"));
        assert!(doc.contains("paperheight=12.00in"));
    }
}
