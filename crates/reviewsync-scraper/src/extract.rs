//! Field extractor: one pass over the materialized review cards.

use std::collections::HashSet;

use reviewsync_core::{RawRecord, UNKNOWN_OWNER};

use crate::renderer::PageRenderer;
use crate::resolve::{first_text, resolve, resolve_all};
use crate::selectors::{self, LocatorSet};
use crate::step::Step;

/// Leading whitespace-delimited token of a star-rating label, if numeric.
///
/// ```
/// use reviewsync_scraper::parse_score_label;
///
/// assert_eq!(parse_score_label("4.0 stars out of five"), "4.0");
/// assert_eq!(parse_score_label("Rated five stars"), "");
/// ```
#[must_use]
pub fn parse_score_label(label: &str) -> String {
    match label.split_whitespace().next() {
        Some(token)
            if token.starts_with(|c: char| c.is_ascii_digit())
                && token
                    .replace(',', ".")
                    .parse::<f64>()
                    .is_ok_and(f64::is_finite) =>
        {
            token.to_string()
        }
        _ => String::new(),
    }
}

/// Text of the page heading, or [`UNKNOWN_OWNER`] when it is missing, empty
/// or unreadable.
pub(crate) async fn profile_label<R>(renderer: &R) -> String
where
    R: PageRenderer + ?Sized,
{
    let Step::Found(heading) = resolve(renderer, None, &selectors::PROFILE_LABEL).await else {
        return UNKNOWN_OWNER.to_string();
    };
    match renderer.text(&heading).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => UNKNOWN_OWNER.to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "profile label read failed");
            UNKNOWN_OWNER.to_string()
        }
    }
}

/// Reads every materialized card under `scope` into a [`RawRecord`].
///
/// With no scope the container is resolved once from the page root; if that
/// also misses, the result is empty. Each field degrades on its own: a
/// failed read counts as a miss for that locator. Noise cards are dropped
/// and exact duplicates keep their first occurrence.
pub async fn extract_records<R>(renderer: &R, scope: Option<&R::Element>) -> Vec<RawRecord>
where
    R: PageRenderer + ?Sized,
{
    let resolved;
    let container = match scope {
        Some(container) => container,
        None => match resolve(renderer, None, &selectors::CONTAINER).await {
            Step::Found(container) => {
                resolved = container;
                &resolved
            }
            Step::Absent | Step::Failed(_) => {
                tracing::warn!("reviews container not found, nothing to extract");
                return Vec::new();
            }
        },
    };

    let fallback_subject = profile_label(renderer).await;

    let cards = match resolve_all(renderer, Some(container), &selectors::CARD).await {
        Step::Found(cards) => cards,
        Step::Absent => Vec::new(),
        Step::Failed(e) => {
            tracing::warn!(error = %e, "card lookup failed");
            Vec::new()
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut duplicates = 0usize;
    let mut noise = 0usize;

    for (index, card) in cards.iter().enumerate() {
        let record = read_card(renderer, card, index, &fallback_subject).await;
        if record.is_noise() {
            noise += 1;
            continue;
        }
        let (subject, body, score) = record.dedup_key();
        if !seen.insert((subject.to_string(), body.to_string(), score.to_string())) {
            duplicates += 1;
            continue;
        }
        records.push(record);
    }

    tracing::info!(
        cards = cards.len(),
        records = records.len(),
        duplicates,
        noise,
        "extracted review records"
    );
    records
}

async fn read_card<R>(
    renderer: &R,
    card: &R::Element,
    index: usize,
    fallback_subject: &str,
) -> RawRecord
where
    R: PageRenderer + ?Sized,
{
    let subject = field_text(renderer, card, index, &selectors::SUBJECT)
        .await
        .unwrap_or_else(|| fallback_subject.to_string());
    let body = field_text(renderer, card, index, &selectors::BODY)
        .await
        .unwrap_or_default();

    RawRecord {
        subject,
        body,
        score: read_score(renderer, card, index).await,
        card_index: index,
    }
}

/// First non-empty text for `set` inside `card`; misses and read errors
/// give `None`.
async fn field_text<R>(
    renderer: &R,
    card: &R::Element,
    index: usize,
    set: &LocatorSet,
) -> Option<String>
where
    R: PageRenderer + ?Sized,
{
    match first_text(renderer, Some(card), set).await {
        Step::Found(text) => Some(text),
        Step::Absent => None,
        Step::Failed(e) => {
            tracing::debug!(card = index, field = set.name, error = %e, "field unreadable");
            None
        }
    }
}

async fn read_score<R>(renderer: &R, card: &R::Element, index: usize) -> String
where
    R: PageRenderer + ?Sized,
{
    let Step::Found(stars) = resolve(renderer, Some(card), &selectors::SCORE).await else {
        return String::new();
    };
    match renderer.attribute(&stars, selectors::SCORE_ATTRIBUTE).await {
        Ok(label) => label.map(|l| parse_score_label(&l)).unwrap_or_default(),
        Err(e) => {
            tracing::debug!(card = index, error = %e, "score label unreadable");
            String::new()
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
