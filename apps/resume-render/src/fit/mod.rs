//! Page-Fit Controller: compile, measure, grow the page, retry.
//!
//! ```text
//! INIT → COMPILE → MEASURE ─┬─ pages ≤ 1 ──────────────→ DONE
//!           ↑               ├─ pages > 1, budget left ─→ ADJUST ─┐
//!           └───────────────┼────────────────────────────────────┘
//!                           └─ pages > 1, no budget ───→ FAILED
//! ```
//!
//! Running out of budget is not an error: the last attempt's artifacts are kept
//! and the report says how many pages it came to. Only a compile error aborts.

mod observer;

pub use observer::{FitObserver, TracingObserver};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::compile::{DocumentCompiler, PageCount, PageCounter};
use crate::errors::RenderError;
use crate::latex::document::MARGIN_IN;
use crate::latex::{Fragment, DEFAULT_PAGE_HEIGHT_IN};
use crate::output::{self, OutputPaths};
use crate::templates::ResumeTemplate;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_HEIGHT_INCREMENT: f64 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Starting height in inches; `None` starts at letter height.
    pub requested_page_height: Option<f64>,
    pub auto_size: bool,
    pub max_attempts: u32,
    pub height_increment: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            requested_page_height: None,
            auto_size: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            height_increment: DEFAULT_HEIGHT_INCREMENT,
        }
    }
}

impl FitOptions {
    /// Rejects heights that leave no text block and increments that never grow
    /// the page. These are caller errors, not document errors.
    pub fn validate(&self) -> Result<(), RenderError> {
        if let Some(height) = self.requested_page_height {
            if !height.is_finite() || height <= 2.0 * MARGIN_IN {
                return Err(RenderError::InvalidInput(format!(
                    "page height {height} must be a finite number of inches greater than {:.1}",
                    2.0 * MARGIN_IN
                )));
            }
        }
        if !self.height_increment.is_finite() || self.height_increment <= 0.0 {
            return Err(RenderError::InvalidInput(format!(
                "height increment {} must be a finite positive number of inches",
                self.height_increment
            )));
        }
        Ok(())
    }
}

/// Mutable loop state, owned by one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageFitState {
    pub current_page_height: f64,
    pub attempts_remaining: u32,
    pub increment: f64,
}

impl PageFitState {
    pub fn new(options: &FitOptions) -> Self {
        PageFitState {
            current_page_height: options
                .requested_page_height
                .unwrap_or(DEFAULT_PAGE_HEIGHT_IN),
            attempts_remaining: options.max_attempts.max(1),
            increment: options.height_increment,
        }
    }

    fn adjust(&mut self) {
        self.current_page_height += self.increment;
        self.attempts_remaining -= 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPhase {
    Init,
    Compile,
    Measure,
    Adjust,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FitVerdict {
    SinglePage,
    BudgetExhausted { pages: u32 },
    /// Auto-sizing was off; the page count was never measured.
    NotMeasured,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    /// `None` when the engine's default page size was used.
    pub page_height: Option<f64>,
    pub pdf_bytes: usize,
    pub page_count: Option<PageCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub template: String,
    pub final_page_height: Option<f64>,
    pub attempts: Vec<AttemptRecord>,
    pub verdict: FitVerdict,
    pub tex_path: String,
    pub pdf_path: String,
    pub generated_at: DateTime<Utc>,
}

impl FitReport {
    pub fn fits_one_page(&self) -> bool {
        self.verdict == FitVerdict::SinglePage
    }
}

/// Collaborators for one fit run.
pub struct FitContext<'a> {
    pub template: &'a dyn ResumeTemplate,
    pub compiler: &'a dyn DocumentCompiler,
    pub counter: &'a dyn PageCounter,
    pub observer: &'a dyn FitObserver,
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

/// Renders `fragments` until they fit on one page or the attempt budget runs out.
///
/// Every attempt overwrites `paths.tex` / `paths.pdf`, so on return they hold
/// the last attempt, which is the one the report describes. The source is
/// written before compiling, so a failed compile leaves it in `paths.tex`.
pub async fn run_page_fit(
    ctx: &FitContext<'_>,
    fragments: &[Fragment],
    options: &FitOptions,
    paths: &OutputPaths,
) -> Result<FitReport, RenderError> {
    options.validate()?;
    let mut state = PageFitState::new(options);
    let mut attempts: Vec<AttemptRecord> = Vec::new();
    ctx.observer.on_phase(FitPhase::Init, &state);

    let verdict = loop {
        ctx.observer.on_phase(FitPhase::Compile, &state);
        let height = if options.auto_size {
            Some(state.current_page_height)
        } else {
            options.requested_page_height
        };

        let source = ctx.template.assemble_document(fragments, height);
        output::write_source(paths, &source).await?;
        let compiled = match ctx.compiler.compile(&source).await {
            Ok(compiled) => compiled,
            Err(e) => {
                warn!(
                    code = e.code(),
                    content = e.is_content_error(),
                    tex = %paths.tex.display(),
                    "Compilation failed on attempt {}",
                    attempts.len() + 1
                );
                ctx.observer.on_phase(FitPhase::Failed, &state);
                return Err(e);
            }
        };
        output::write_pdf(paths, &compiled.pdf_bytes).await?;

        let mut record = AttemptRecord {
            attempt: attempts.len() as u32 + 1,
            page_height: height,
            pdf_bytes: compiled.pdf_bytes.len(),
            page_count: None,
        };

        if !options.auto_size {
            ctx.observer.on_attempt(&record);
            attempts.push(record);
            ctx.observer.on_phase(FitPhase::Done, &state);
            break FitVerdict::NotMeasured;
        }

        ctx.observer.on_phase(FitPhase::Measure, &state);
        let count = ctx.counter.count_pages(&paths.pdf, &compiled.engine_log).await;
        record.page_count = Some(count);
        ctx.observer.on_attempt(&record);
        attempts.push(record);

        if count.pages <= 1 {
            ctx.observer.on_phase(FitPhase::Done, &state);
            break FitVerdict::SinglePage;
        }
        if state.attempts_remaining > 1 {
            state.adjust();
            ctx.observer.on_phase(FitPhase::Adjust, &state);
            continue;
        }
        ctx.observer.on_phase(FitPhase::Failed, &state);
        break FitVerdict::BudgetExhausted { pages: count.pages };
    };

    let final_page_height = attempts.last().and_then(|a| a.page_height);
    info!(
        attempts = attempts.len(),
        ?verdict,
        ?final_page_height,
        "Page fit finished"
    );

    Ok(FitReport {
        template: ctx.template.name().to_string(),
        final_page_height,
        attempts,
        verdict,
        tex_path: paths.tex.display().to_string(),
        pdf_path: paths.pdf.display().to_string(),
        generated_at: Utc::now(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
