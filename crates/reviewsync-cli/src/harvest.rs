//! Direct-run mode: one unattended harvest of a fixed source, reported to the
//! log stream.

use reviewsync_core::{AppConfig, EnrichedRecord, HarvestConfig, RunMode};
use reviewsync_scraper::{run_session, validate_source_url, BrowserSettings, ChromiumRenderer};
use reviewsync_store::{sync_records, AirtableClient};

/// Harvest `url` (or the configured source) and sync the records.
///
/// When `dry_run` is `true` the records are logged and nothing is written to
/// the store.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the store client cannot be built,
/// the browser cannot be launched, or the page cannot be loaded. Per-record
/// store failures are counted, not propagated.
pub(crate) async fn run_harvest(
    config: &AppConfig,
    url: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let result = harvest_and_sync(config, url.unwrap_or(&config.source_url), dry_run).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "harvest run failed");
    }
    result
}

async fn harvest_and_sync(config: &AppConfig, url: &str, dry_run: bool) -> anyhow::Result<()> {
    let url = validate_source_url(url)?;

    let store = if dry_run {
        None
    } else {
        config
            .store_credentials()
            .map(|credentials| {
                AirtableClient::from_credentials(credentials, config.store_timeout_secs)
            })
            .transpose()?
    };
    if !dry_run && store.is_none() {
        tracing::warn!("AIRTABLE_API_KEY or AIRTABLE_BASE_ID not set; records will not be synced");
    }

    let renderer = ChromiumRenderer::launch(&BrowserSettings::from_app_config(config)).await?;
    let harvest = HarvestConfig::from_app_config(RunMode::Unattended, config);
    let records = run_session(&renderer, &url, &harvest).await?;

    if dry_run {
        log_records(&records);
        tracing::info!(url = %url, count = records.len(), "dry-run: skipping store sync");
        return Ok(());
    }

    let outcome = sync_records(store.as_ref(), &records).await;
    tracing::info!(
        url = %url,
        count = records.len(),
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        failed = outcome.failed,
        "harvest run complete"
    );
    Ok(())
}

fn log_records(records: &[EnrichedRecord]) {
    for record in records {
        tracing::info!(
            owner = %record.owner,
            subject = %record.record.subject,
            score = %record.record.score,
            city = %record.location.city,
            region = %record.location.region,
            country = %record.location.country,
            body = %record.record.body,
            "record"
        );
    }
}

pub(crate) fn print_config(config: &AppConfig) {
    println!("{config:#?}");
    println!(
        "store sync: {}",
        if config.store_credentials().is_some() {
            "enabled"
        } else {
            "disabled (credentials not set)"
        }
    );
    println!(
        "{:#?}",
        HarvestConfig::from_app_config(RunMode::Unattended, config)
    );
}
