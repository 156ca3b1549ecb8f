//! Record-store side of reviewsync: the [`RecordStore`] seam, the Airtable
//! client behind it, and the dedup-and-sync engine.

pub mod airtable;
pub mod error;
pub mod formula;
pub mod payload;
pub mod store;
pub mod sync;

pub use airtable::AirtableClient;
pub use error::StoreError;
pub use payload::{build_fields, duplicate_filter};
pub use store::{RecordStore, StoredRecord};
pub use sync::sync_records;
