use reviewsync_core::ExpandConfig;

use crate::renderer::PageRenderer;
use crate::resolve::resolve_all;
use crate::selectors;
use crate::step::Step;

/// Clicks the "More" buttons on truncated reviews so extraction sees full
/// bodies. Returns the number of successful clicks.
pub async fn expand_reviews<R>(renderer: &R, config: &ExpandConfig) -> usize
where
    R: PageRenderer + ?Sized,
{
    let buttons = match resolve_all(renderer, None, &selectors::EXPAND_BUTTON).await {
        Step::Found(buttons) => buttons,
        Step::Absent => Vec::new(),
        Step::Failed(e) => {
            tracing::debug!(error = %e, "expand button lookup failed");
            Vec::new()
        }
    };

    let mut clicked = 0;
    for button in buttons.iter().take(config.max_buttons) {
        match renderer.click(button).await {
            Ok(()) => clicked += 1,
            Err(e) => tracing::debug!(error = %e, "expand click failed"),
        }
        tokio::time::sleep(config.click_pause).await;
    }
    tokio::time::sleep(config.settle).await;

    tracing::info!(found = buttons.len(), clicked, "expanded truncated reviews");
    clicked
}
