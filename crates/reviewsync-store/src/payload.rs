//! Mapping between enriched records and store fields.

use reviewsync_core::EnrichedRecord;
use serde_json::{Map, Value};

pub const OWNER_FIELD: &str = "Name_Creator";
pub const SUBJECT_FIELD: &str = "business_name";
pub const BODY_FIELD: &str = "Uplaud";
pub const SCORE_FIELD: &str = "Uplaud Score";
pub const CITY_FIELD: &str = "City";
pub const REGION_FIELD: &str = "State";
pub const COUNTRY_FIELD: &str = "Country";

/// Store fields for `record`.
///
/// Owner, subject, body and score are always present; score is a number, or
/// `null` when the text does not parse. City, region and country are only
/// present when non-empty.
#[must_use]
pub fn build_fields(record: &EnrichedRecord) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(OWNER_FIELD.to_string(), Value::from(record.owner.as_str()));
    fields.insert(
        SUBJECT_FIELD.to_string(),
        Value::from(record.record.subject.as_str()),
    );
    fields.insert(BODY_FIELD.to_string(), Value::from(record.record.body.as_str()));
    fields.insert(
        SCORE_FIELD.to_string(),
        record
            .record
            .score_value()
            .map_or(Value::Null, Value::from),
    );

    for (field, value) in [
        (CITY_FIELD, &record.location.city),
        (REGION_FIELD, &record.location.region),
        (COUNTRY_FIELD, &record.location.country),
    ] {
        if !value.is_empty() {
            fields.insert(field.to_string(), Value::from(value.as_str()));
        }
    }
    fields
}

/// The `(owner, subject, body)` equality filter used for duplicate checks.
#[must_use]
pub fn duplicate_filter(record: &EnrichedRecord) -> [(&'static str, &str); 3] {
    [
        (OWNER_FIELD, record.owner.as_str()),
        (SUBJECT_FIELD, record.record.subject.as_str()),
        (BODY_FIELD, record.record.body.as_str()),
    ]
}
