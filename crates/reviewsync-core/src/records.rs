//! Review records as they move through the harvest pipeline.
//!
//! `RawRecord` is what the field extractor reads off one review card.
//! `EnrichedRecord` adds the profile owner and a best-effort location.
//! Both are single-run values; the record store is the only durable copy.

use serde::{Deserialize, Serialize};

/// Owner recorded when the profile heading cannot be read.
pub const UNKNOWN_OWNER: &str = "Unknown";

/// One review as read off a card, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Name of the reviewed place. Falls back to the profile label when the
    /// card carries no place name.
    pub subject: String,

    /// Review text, trimmed. May be empty for rating-only reviews.
    pub body: String,

    /// Leading token of the star-rating label (e.g. `"4.0"`), kept as text.
    /// Empty when the card had no parseable rating.
    pub score: String,

    /// Position of the originating card in the extraction pass. Enrichment
    /// correlates on this index.
    #[serde(skip)]
    pub card_index: usize,
}

impl RawRecord {
    /// A card with neither text nor rating is not a review.
    #[must_use]
    pub fn is_noise(&self) -> bool {
        self.body.is_empty() && self.score.is_empty()
    }

    /// Exact-tuple uniqueness key within one extraction pass.
    #[must_use]
    pub fn dedup_key(&self) -> (&str, &str, &str) {
        (&self.subject, &self.body, &self.score)
    }

    /// Numeric coercion of [`Self::score`], applied at sync time.
    ///
    /// Returns `None` for an empty or non-numeric score. A decimal comma
    /// (`"4,5"`) is accepted.
    #[must_use]
    pub fn score_value(&self) -> Option<f64> {
        let raw = self.score.trim();
        if raw.is_empty() {
            return None;
        }
        raw.parse::<f64>()
            .or_else(|_| raw.replace(',', ".").parse::<f64>())
            .ok()
            .filter(|v| v.is_finite())
    }
}

/// Best-effort geographic tags parsed from a card. Empty strings mean
/// "not resolved", which is an expected state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub country: String,
}

impl Location {
    /// Splits a comma-delimited location string into trailing components.
    ///
    /// The last segment is the country. With three or more segments the
    /// two before it are city and region; with exactly two, the first is
    /// the city and region stays empty.
    ///
    /// ```
    /// use reviewsync_core::Location;
    ///
    /// let loc = Location::parse("12 Main St, Austin, TX, USA");
    /// assert_eq!(loc.city, "Austin");
    /// assert_eq!(loc.region, "TX");
    /// assert_eq!(loc.country, "USA");
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let parts: Vec<&str> = text
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        match parts.as_slice() {
            [] => Self::default(),
            [country] => Self {
                country: (*country).to_string(),
                ..Self::default()
            },
            [city, country] => Self {
                city: (*city).to_string(),
                region: String::new(),
                country: (*country).to_string(),
            },
            [.., city, region, country] => Self {
                city: (*city).to_string(),
                region: (*region).to_string(),
                country: (*country).to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_empty() && self.region.is_empty() && self.country.is_empty()
    }
}

/// A raw record plus owner identity and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: RawRecord,
    pub owner: String,
    #[serde(flatten)]
    pub location: Location,
}

impl EnrichedRecord {
    /// The coarse fallback used when the enrichment stage fails as a whole.
    #[must_use]
    pub fn unenriched(record: RawRecord) -> Self {
        Self {
            record,
            owner: UNKNOWN_OWNER.to_string(),
            location: Location::default(),
        }
    }
}

/// Counts reported by one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// Records created in the store.
    pub inserted: usize,
    /// Records rejected as duplicates, locally or by the store.
    pub skipped: usize,
    /// Records whose insert call failed; neither inserted nor skipped.
    pub failed: usize,
}
