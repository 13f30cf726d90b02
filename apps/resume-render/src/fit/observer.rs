use tracing::{debug, info, warn};

use super::{AttemptRecord, FitPhase, PageFitState};

/// Receives every state transition of a fit run. Injected per run; there is
/// no global monitor.
pub trait FitObserver: Send + Sync {
    fn on_phase(&self, phase: FitPhase, state: &PageFitState);

    fn on_attempt(&self, _record: &AttemptRecord) {}
}

/// Default observer: writes transitions to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FitObserver for TracingObserver {
    fn on_phase(&self, phase: FitPhase, state: &PageFitState) {
        match phase {
            FitPhase::Adjust => info!(
                height = state.current_page_height,
                remaining = state.attempts_remaining,
                "Content overflows one page; growing page height"
            ),
            FitPhase::Failed => warn!(
                height = state.current_page_height,
                "Page fit stopped without a single-page result"
            ),
            _ => debug!(?phase, height = state.current_page_height, "Fit phase"),
        }
    }

    fn on_attempt(&self, record: &AttemptRecord) {
        match &record.page_count {
            Some(count) if count.source.is_degraded() => warn!(
                attempt = record.attempt,
                pages = count.pages,
                source = ?count.source,
                "Page count is an estimate"
            ),
            Some(count) => info!(attempt = record.attempt, pages = count.pages, "Attempt measured"),
            None => info!(attempt = record.attempt, bytes = record.pdf_bytes, "Attempt compiled"),
        }
    }
}
