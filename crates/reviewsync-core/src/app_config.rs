use std::net::SocketAddr;
use std::path::PathBuf;

/// Table written to when `AIRTABLE_TABLE_NAME` is unset.
pub const DEFAULT_TABLE_NAME: &str = "Uplaud";

/// Profile harvested by the direct-run mode when `REVIEWSYNC_SOURCE_URL` is unset.
pub const DEFAULT_SOURCE_URL: &str =
    "https://www.google.com/maps/contrib/110753570881278213135/reviews/";

#[derive(Clone)]
pub struct AppConfig {
    pub airtable_api_key: Option<String>,
    pub airtable_base_id: Option<String>,
    pub airtable_table_name: String,
    pub store_timeout_secs: u64,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub source_url: String,
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub settle_ms: u64,
    pub page_load_wait_ms: u64,
}

/// Record-store credentials, present only when both the API key and the base
/// identifier are configured.
#[derive(Clone, Copy)]
pub struct StoreCredentials<'a> {
    pub api_key: &'a str,
    pub base_id: &'a str,
    pub table_name: &'a str,
}

impl AppConfig {
    /// Returns the record-store credentials, or `None` when either the API key
    /// or the base identifier is missing. Callers treat `None` as "harvest
    /// only": sync becomes a no-op rather than a startup failure.
    #[must_use]
    pub fn store_credentials(&self) -> Option<StoreCredentials<'_>> {
        let api_key = self.airtable_api_key.as_deref()?;
        let base_id = self.airtable_base_id.as_deref()?;
        Some(StoreCredentials {
            api_key,
            base_id,
            table_name: &self.airtable_table_name,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "airtable_api_key",
                &self.airtable_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("airtable_base_id", &self.airtable_base_id)
            .field("airtable_table_name", &self.airtable_table_name)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("source_url", &self.source_url)
            .field("headless", &self.headless)
            .field("chrome_path", &self.chrome_path)
            .field("settle_ms", &self.settle_ms)
            .field("page_load_wait_ms", &self.page_load_wait_ms)
            .finish()
    }
}

impl std::fmt::Debug for StoreCredentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("api_key", &"[redacted]")
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .finish()
    }
}
