//! One harvest run: navigate, scroll, expand, extract, enrich.

use reviewsync_core::{EnrichedRecord, HarvestConfig};

use crate::enrich::enrich_records;
use crate::error::ScraperError;
use crate::expand::expand_reviews;
use crate::extract::extract_records;
use crate::renderer::PageRenderer;
use crate::resolve::resolve;
use crate::scroll::scroll_until_stable;
use crate::selectors;

/// Checks that `raw` is an absolute http(s) URL and returns it trimmed.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] for any other scheme or an empty
/// remainder after the scheme.
pub fn validate_source_url(raw: &str) -> Result<String, ScraperError> {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));

    match rest {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_string()),
        Some(_) => Err(ScraperError::InvalidUrl {
            url: trimmed.to_string(),
            reason: "missing host".to_string(),
        }),
        None => Err(ScraperError::InvalidUrl {
            url: trimmed.to_string(),
            reason: "must start with http:// or https://".to_string(),
        }),
    }
}

/// Harvests every review on the page at `url`.
///
/// Only a failed navigation aborts the run; every later stage degrades to
/// partial or empty results.
///
/// # Errors
///
/// Returns [`ScraperError::Navigation`] if the page cannot be loaded.
pub async fn harvest_page<R>(
    renderer: &R,
    url: &str,
    config: &HarvestConfig,
) -> Result<Vec<EnrichedRecord>, ScraperError>
where
    R: PageRenderer + ?Sized,
{
    tracing::info!(url, mode = %config.mode, "starting harvest");
    renderer
        .navigate(url)
        .await
        .map_err(|source| ScraperError::Navigation {
            url: url.to_string(),
            source,
        })?;
    tokio::time::sleep(config.page_load_wait).await;

    let container = resolve(renderer, None, &selectors::CONTAINER).await.found();
    if container.is_none() {
        tracing::warn!(url, "reviews container not found, scrolling the document");
    }

    let report = scroll_until_stable(renderer, container.as_ref(), &config.scroll).await;
    let expanded = expand_reviews(renderer, &config.expand).await;
    let raw = extract_records(renderer, container.as_ref()).await;
    let records = enrich_records(renderer, container.as_ref(), raw).await;

    tracing::info!(
        url,
        rounds = report.rounds,
        converged = report.converged,
        expanded,
        records = records.len(),
        "harvest finished"
    );
    Ok(records)
}

/// Runs [`harvest_page`] and then shuts the renderer down, whatever the
/// outcome. Teardown errors are logged and dropped.
///
/// # Errors
///
/// Propagates the harvest error, after teardown.
pub async fn run_session<R>(
    renderer: &R,
    url: &str,
    config: &HarvestConfig,
) -> Result<Vec<EnrichedRecord>, ScraperError>
where
    R: PageRenderer + ?Sized,
{
    let result = harvest_page(renderer, url, config).await;
    if let Err(e) = renderer.shutdown().await {
        tracing::warn!(error = %e, "renderer shutdown failed");
    }
    result
}
