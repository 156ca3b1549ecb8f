//! Enrichment: owner identity and best-effort location per record.
//!
//! Cards are re-resolved here and matched to records by each record's
//! `card_index`. The page may keep rendering between extraction and this
//! pass, so the match is positional and can drift; a drifted card only
//! costs a wrong or empty location. An unreadable location costs only that
//! record's location.

use reviewsync_core::{EnrichedRecord, Location, RawRecord};

use crate::error::RenderError;
use crate::extract::profile_label;
use crate::renderer::PageRenderer;
use crate::resolve::{first_text, resolve, resolve_all};
use crate::selectors;
use crate::step::Step;

/// Attaches owner and location to every record.
///
/// Without a reviews container every record keeps the owner and gets an
/// empty location. Only a failed container or card lookup falls back to
/// [`EnrichedRecord::unenriched`] for all records at once.
pub async fn enrich_records<R>(
    renderer: &R,
    scope: Option<&R::Element>,
    records: Vec<RawRecord>,
) -> Vec<EnrichedRecord>
where
    R: PageRenderer + ?Sized,
{
    if records.is_empty() {
        return Vec::new();
    }

    match try_enrich(renderer, scope, &records).await {
        Ok(enriched) => {
            let located = enriched.iter().filter(|r| !r.location.is_empty()).count();
            tracing::info!(records = enriched.len(), located, "enriched review records");
            enriched
        }
        Err(e) => {
            tracing::warn!(error = %e, "enrichment failed, using unenriched records");
            records.into_iter().map(EnrichedRecord::unenriched).collect()
        }
    }
}

async fn try_enrich<R>(
    renderer: &R,
    scope: Option<&R::Element>,
    records: &[RawRecord],
) -> Result<Vec<EnrichedRecord>, RenderError>
where
    R: PageRenderer + ?Sized,
{
    let owner = profile_label(renderer).await;

    let resolved;
    let container = match scope {
        Some(container) => Some(container),
        None => {
            resolved = resolve(renderer, None, &selectors::CONTAINER)
                .await
                .into_result()?;
            resolved.as_ref()
        }
    };

    let cards = match container {
        Some(container) => resolve_all(renderer, Some(container), &selectors::CARD)
            .await
            .into_result()?
            .unwrap_or_default(),
        None => {
            tracing::warn!("reviews container not found, locations left empty");
            Vec::new()
        }
    };

    let mut enriched = Vec::with_capacity(records.len());
    for record in records {
        let location = match cards.get(record.card_index) {
            Some(card) => card_location(renderer, card, record.card_index).await,
            None => Location::default(),
        };
        enriched.push(EnrichedRecord {
            record: record.clone(),
            owner: owner.clone(),
            location,
        });
    }
    Ok(enriched)
}

async fn card_location<R>(renderer: &R, card: &R::Element, index: usize) -> Location
where
    R: PageRenderer + ?Sized,
{
    match first_text(renderer, Some(card), &selectors::LOCATION).await {
        Step::Found(text) => Location::parse(&text),
        Step::Absent => Location::default(),
        Step::Failed(e) => {
            tracing::debug!(card = index, error = %e, "location unreadable");
            Location::default()
        }
    }
}
