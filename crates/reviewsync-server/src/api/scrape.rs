use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use reviewsync_core::{AppConfig, EnrichedRecord, HarvestConfig, RunMode, SyncOutcome};
use reviewsync_scraper::{run_session, validate_source_url, BrowserSettings, ChromiumRenderer};
use reviewsync_store::{sync_records, AirtableClient};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

const INVALID_URL_MESSAGE: &str = "Provide a valid http/https URL.";

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScrapeResponse {
    status: &'static str,
    count: usize,
    inserted_to_store: usize,
    skipped_duplicates: usize,
    failed_inserts: usize,
    records: Vec<EnrichedRecord>,
}

impl ScrapeResponse {
    fn success(records: Vec<EnrichedRecord>, outcome: SyncOutcome) -> Self {
        Self {
            status: "success",
            count: records.len(),
            inserted_to_store: outcome.inserted,
            skipped_duplicates: outcome.skipped,
            failed_inserts: outcome.failed,
            records,
        }
    }
}

/// `POST /scrape`: harvests the profile at `url` and syncs it to the store.
///
/// The URL is validated before any browser is launched.
pub(super) async fn scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let raw = match payload {
        Ok(Json(body)) => body.url,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable scrape request body");
            String::new()
        }
    };
    let url = validate_source_url(&raw).map_err(|e| {
        tracing::debug!(error = %e, "rejected scrape request");
        ApiError::new(req_id.0.clone(), "bad_request", INVALID_URL_MESSAGE)
    })?;

    match scrape_and_sync(&state.config, &url).await {
        Ok((records, outcome)) => Ok(Json(ScrapeResponse::success(records, outcome))),
        Err(e) => {
            let diagnostic = format!("{e:#}");
            tracing::error!(url = %url, request_id = %req_id.0, error = %diagnostic, "scrape failed");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                format!("Scrape failed: {diagnostic}"),
            ))
        }
    }
}

async fn scrape_and_sync(
    config: &AppConfig,
    url: &str,
) -> anyhow::Result<(Vec<EnrichedRecord>, SyncOutcome)> {
    let store = config
        .store_credentials()
        .map(|credentials| AirtableClient::from_credentials(credentials, config.store_timeout_secs))
        .transpose()?;

    let renderer = ChromiumRenderer::launch(&BrowserSettings::from_app_config(config)).await?;
    let harvest = HarvestConfig::from_app_config(RunMode::RequestTriggered, config);
    let records = run_session(&renderer, url, &harvest).await?;

    let outcome = sync_records(store.as_ref(), &records).await;
    Ok((records, outcome))
}
