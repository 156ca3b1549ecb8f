//! Harvest tuning: scroll ceilings, settle intervals and expansion limits.
//!
//! Every default lives here as a named constant and reaches the harvest
//! stages through [`HarvestConfig`]; no stage reads ambient state.

use std::time::Duration;

use crate::AppConfig;

/// Rounds during which the scroller never stops on stability.
pub const DEFAULT_MIN_SCROLLS: usize = 20;

/// Pause after each scroll so the renderer can materialize new items.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(1200);

/// Pause after navigation before the first lookup.
pub const DEFAULT_PAGE_LOAD_WAIT: Duration = Duration::from_millis(2500);

/// Upper bound on "More" buttons clicked per run.
pub const DEFAULT_MAX_EXPAND_BUTTONS: usize = 300;

/// Pause between consecutive "More" clicks.
pub const DEFAULT_EXPAND_CLICK_PAUSE: Duration = Duration::from_millis(80);

/// How a harvest was started. The two modes differ only in how long the
/// scroller is willing to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// A caller is waiting on the response (`POST /scrape`).
    RequestTriggered,
    /// Direct run with nobody waiting.
    Unattended,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::RequestTriggered => write!(f, "request-triggered"),
            RunMode::Unattended => write!(f, "unattended"),
        }
    }
}

/// Convergence scroller limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Hard ceiling on scroll rounds; reaching it ends the loop without convergence.
    pub max_scrolls: usize,
    /// Stability is ignored before this (1-based) round.
    pub min_scrolls: usize,
    /// Consecutive rounds with unchanged card count and extent needed to stop.
    pub max_stable_rounds: usize,
    pub settle: Duration,
}

impl ScrollConfig {
    #[must_use]
    pub fn for_mode(mode: RunMode) -> Self {
        let (max_scrolls, max_stable_rounds) = match mode {
            RunMode::RequestTriggered => (300, 5),
            RunMode::Unattended => (800, 8),
        };
        Self {
            max_scrolls,
            min_scrolls: DEFAULT_MIN_SCROLLS,
            max_stable_rounds,
            settle: DEFAULT_SETTLE,
        }
    }
}

/// Limits for clicking "More" buttons on truncated reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandConfig {
    pub max_buttons: usize,
    pub click_pause: Duration,
    /// Wait after the last click before extraction starts.
    pub settle: Duration,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            max_buttons: DEFAULT_MAX_EXPAND_BUTTONS,
            click_pause: DEFAULT_EXPAND_CLICK_PAUSE,
            settle: DEFAULT_SETTLE,
        }
    }
}

/// Everything one harvest run needs to know about timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestConfig {
    pub mode: RunMode,
    pub page_load_wait: Duration,
    pub scroll: ScrollConfig,
    pub expand: ExpandConfig,
}

impl HarvestConfig {
    /// Defaults for `mode`, with no environment overrides applied.
    #[must_use]
    pub fn for_mode(mode: RunMode) -> Self {
        Self {
            mode,
            page_load_wait: DEFAULT_PAGE_LOAD_WAIT,
            scroll: ScrollConfig::for_mode(mode),
            expand: ExpandConfig::default(),
        }
    }

    /// Defaults for `mode` with the settle interval and page-load wait taken
    /// from `config`.
    #[must_use]
    pub fn from_app_config(mode: RunMode, config: &AppConfig) -> Self {
        let settle = Duration::from_millis(config.settle_ms);
        let mut harvest = Self::for_mode(mode);
        harvest.page_load_wait = Duration::from_millis(config.page_load_wait_ms);
        harvest.scroll.settle = settle;
        harvest.expand.settle = settle;
        harvest
    }

    /// Zero-wait variant for tests.
    #[must_use]
    pub fn without_waits(mut self) -> Self {
        self.page_load_wait = Duration::ZERO;
        self.scroll.settle = Duration::ZERO;
        self.expand.click_pause = Duration::ZERO;
        self.expand.settle = Duration::ZERO;
        self
    }
}
