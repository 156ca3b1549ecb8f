//! Dedup-and-sync: insert each record only if neither this batch nor the
//! store already holds its `(owner, subject, body)` triple.
//!
//! The store check and the insert are separate calls, so two runs over the
//! same content at the same time can both insert. The store is the only
//! cross-run source of truth.

use std::collections::HashSet;

use reviewsync_core::{EnrichedRecord, SyncOutcome};

use crate::payload::{build_fields, duplicate_filter};
use crate::store::RecordStore;

/// Syncs `records` into `store` in input order.
///
/// `None` means no credentials are configured: nothing is sent and the
/// outcome is all zeros. A failed duplicate query counts as "not present".
/// A failed insert is counted in `failed` and the batch continues.
pub async fn sync_records<S>(store: Option<&S>, records: &[EnrichedRecord]) -> SyncOutcome
where
    S: RecordStore + ?Sized,
{
    let mut outcome = SyncOutcome::default();
    let Some(store) = store else {
        tracing::info!(
            records = records.len(),
            "record store not configured, skipping sync"
        );
        return outcome;
    };

    let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();

    for record in records {
        let key = (
            record.owner.as_str(),
            record.record.subject.as_str(),
            record.record.body.as_str(),
        );
        if !seen.insert(key) {
            outcome.skipped += 1;
            tracing::debug!(subject = key.1, "duplicate within batch, skipping");
            continue;
        }

        let filter = duplicate_filter(record);
        let exists = match store.contains(&filter).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(
                    subject = key.1,
                    error = %e,
                    "duplicate check failed, inserting anyway"
                );
                false
            }
        };
        if exists {
            outcome.skipped += 1;
            tracing::debug!(subject = key.1, "already in store, skipping");
            continue;
        }

        match store.create(build_fields(record)).await {
            Ok(created) => {
                outcome.inserted += 1;
                tracing::debug!(subject = key.1, id = %created.id, "inserted record");
            }
            Err(e) => {
                outcome.failed += 1;
                tracing::warn!(subject = key.1, error = %e, "insert failed");
            }
        }
    }

    tracing::info!(
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        failed = outcome.failed,
        "sync finished"
    );
    outcome
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
