//! Convergence scroller.
//!
//! The feed never says "that's everything", so the loop watches two signals
//! (matched card count and scroll extent) and stops only after both have
//! held still for `max_stable_rounds` consecutive rounds, and never before
//! `min_scrolls` rounds. Hitting `max_scrolls` ends the loop without
//! convergence; a partial harvest is still a harvest.

use reviewsync_core::ScrollConfig;

use crate::renderer::PageRenderer;
use crate::resolve::resolve_all;
use crate::selectors;
use crate::step::Step;

/// What the scroller observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    pub rounds: usize,
    pub cards: usize,
    pub extent: i64,
    pub converged: bool,
}

/// Last observation plus the run of unchanged rounds. Only ever advanced or
/// zeroed, never reset mid-run.
#[derive(Debug, Clone, Copy)]
struct StabilityState {
    last_count: i64,
    last_extent: i64,
    stable_rounds: usize,
}

impl StabilityState {
    fn new() -> Self {
        Self {
            last_count: -1,
            last_extent: -1,
            stable_rounds: 0,
        }
    }

    fn observe(&mut self, count: usize, extent: i64) {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        if count == self.last_count && extent == self.last_extent {
            self.stable_rounds += 1;
        } else {
            self.stable_rounds = 0;
        }
        self.last_count = count;
        self.last_extent = extent;
    }
}

/// Scrolls `scope` (the whole document when `None`) until the card list
/// converges or the round ceiling is reached.
pub async fn scroll_until_stable<R>(
    renderer: &R,
    scope: Option<&R::Element>,
    config: &ScrollConfig,
) -> ScrollReport
where
    R: PageRenderer + ?Sized,
{
    let mut state = StabilityState::new();
    let mut report = ScrollReport {
        rounds: 0,
        cards: 0,
        extent: 0,
        converged: false,
    };

    for round in 1..=config.max_scrolls {
        scroll_once(renderer, scope).await;
        tokio::time::sleep(config.settle).await;

        let cards = match resolve_all(renderer, scope, &selectors::CARD).await {
            Step::Found(cards) => cards,
            Step::Absent => Vec::new(),
            Step::Failed(e) => {
                tracing::debug!(round, error = %e, "card count read failed");
                Vec::new()
            }
        };
        let extent = read_extent(renderer, scope).await;

        if let Some(last) = cards.last() {
            if let Err(e) = renderer.scroll_into_view(last).await {
                tracing::debug!(round, error = %e, "scroll last card into view failed");
            }
        }

        state.observe(cards.len(), extent);
        report = ScrollReport {
            rounds: round,
            cards: cards.len(),
            extent,
            converged: false,
        };
        tracing::debug!(
            round,
            cards = cards.len(),
            extent,
            stable_rounds = state.stable_rounds,
            "scroll round"
        );

        if round >= config.min_scrolls && state.stable_rounds >= config.max_stable_rounds {
            report.converged = true;
            break;
        }
    }

    if report.converged {
        tracing::info!(rounds = report.rounds, cards = report.cards, "scroll converged");
    } else {
        tracing::warn!(
            rounds = report.rounds,
            cards = report.cards,
            "scroll ceiling reached without convergence"
        );
    }
    report
}

/// One viewport of scrolling. A failing scope is retried once against the
/// document; a second failure is a no-op.
async fn scroll_once<R>(renderer: &R, scope: Option<&R::Element>)
where
    R: PageRenderer + ?Sized,
{
    if scope.is_some() {
        match renderer.scroll_by_viewport(scope).await {
            Ok(()) => return,
            Err(e) => tracing::debug!(error = %e, "scope scroll failed, scrolling document"),
        }
    }
    if let Err(e) = renderer.scroll_by_viewport(None).await {
        tracing::debug!(error = %e, "document scroll failed");
    }
}

/// Scroll extent of `scope`, falling back to the document, then to zero.
async fn read_extent<R>(renderer: &R, scope: Option<&R::Element>) -> i64
where
    R: PageRenderer + ?Sized,
{
    if scope.is_some() {
        match renderer.scroll_extent(scope).await {
            Ok(extent) => return extent,
            Err(e) => tracing::debug!(error = %e, "scope extent read failed, reading document"),
        }
    }
    match renderer.scroll_extent(None).await {
        Ok(extent) => extent,
        Err(e) => {
            tracing::debug!(error = %e, "document extent read failed");
            0
        }
    }
}

#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;
