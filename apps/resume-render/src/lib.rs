//! Structured resume data in, single-page typeset PDF out.
//!
//! Input JSON of any of the known shapes is normalized, rendered to LaTeX section
//! by section, and compiled with an external engine. When the result spills onto
//! a second page the page is made taller and the document recompiled.

pub mod compile;
pub mod config;
pub mod errors;
pub mod fit;
pub mod generate;
pub mod latex;
pub mod models;
pub mod normalize;
pub mod output;
pub mod templates;

pub use errors::RenderError;
pub use fit::{FitOptions, FitReport, FitVerdict};
pub use generate::{GenerateRequest, Renderer};
pub use templates::{ResumeTemplate, TemplateRegistry};
