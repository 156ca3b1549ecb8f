//! HTTP client for the Airtable REST API.
//!
//! Wraps `reqwest` with bearer auth, formula-based queries with `offset`
//! pagination, and typed responses. Non-2xx responses surface as
//! [`StoreError::Api`] with Airtable's own error message when one is present.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use reviewsync_core::StoreCredentials;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::formula;
use crate::store::{RecordStore, StoredRecord};

const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0/";

/// Upper bound on result pages followed for one query.
pub(crate) const MAX_PAGES: usize = 100;

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<StoredRecord>,
    offset: Option<String>,
}

/// Client for one Airtable table.
///
/// Use [`AirtableClient::new`] for production or
/// [`AirtableClient::with_base_url`] to point at a mock server in tests.
pub struct AirtableClient {
    client: Client,
    api_key: String,
    table: String,
    table_url: Url,
}

impl AirtableClient {
    /// Creates a client for `table` in base `base_id` on the production API.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        base_id: &str,
        table: &str,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        Self::with_base_url(api_key, base_id, table, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client from configured credentials.
    ///
    /// # Errors
    ///
    /// See [`AirtableClient::new`].
    pub fn from_credentials(
        credentials: StoreCredentials<'_>,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        Self::new(
            credentials.api_key,
            credentials.base_id,
            credentials.table_name,
            timeout_secs,
        )
    }

    /// Creates a client with a custom API root (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StoreError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        api_key: &str,
        base_id: &str,
        table: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("reviewsync/0.1")
            .build()?;

        let invalid = |reason: String| StoreError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let mut table_url = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        table_url
            .path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .push(base_id)
            .push(table);

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            table: table.to_owned(),
            table_url,
        })
    }

    /// Builds the table URL with the given query parameters, percent-encoded.
    fn build_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.table_url.clone();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends an authenticated request and parses the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] on network failure,
    /// [`StoreError::Api`] on a non-2xx status, and
    /// [`StoreError::Deserialize`] if the body is not valid JSON.
    async fn request_json(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<Value, StoreError> {
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// Runs a formula query, following `offset` until exhausted or until
    /// `max_records` have been returned.
    async fn query(
        &self,
        formula: &str,
        max_records: Option<usize>,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let max_param = max_records.map(|n| n.to_string());
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut params = vec![("filterByFormula", formula)];
            if let Some(max) = &max_param {
                params.push(("maxRecords", max.as_str()));
            }
            if let Some(offset) = &offset {
                params.push(("offset", offset.as_str()));
            }

            let url = self.build_url(&params);
            let body = self
                .request_json(self.client.get(url), &format!("list {}", self.table))
                .await?;
            let page: ListResponse =
                serde_json::from_value(body).map_err(|e| StoreError::Deserialize {
                    context: format!("list {}", self.table),
                    source: e,
                })?;

            records.extend(page.records);
            if let Some(limit) = max_records {
                if records.len() >= limit {
                    records.truncate(limit);
                    return Ok(records);
                }
            }
            match page.offset {
                Some(next) => offset = Some(next),
                None => return Ok(records),
            }
        }

        Err(StoreError::PaginationLimit {
            table: self.table.clone(),
            max_pages: MAX_PAGES,
        })
    }
}

/// Extracts Airtable's error text from an error body, which is either
/// `{"error": {"type": ..., "message": ...}}` or `{"error": "TYPE"}`.
fn api_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    match error {
        Some(Value::String(kind)) => kind.clone(),
        Some(Value::Object(obj)) => obj
            .get("message")
            .or_else(|| obj.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string(),
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn find_matching(
        &self,
        filter: &[(&str, &str)],
    ) -> Result<Vec<StoredRecord>, StoreError> {
        self.query(&formula::equality(filter), None).await
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<StoredRecord, StoreError> {
        let payload = serde_json::json!({ "fields": fields });
        let request = self.client.post(self.table_url.clone()).json(&payload);
        let body = self
            .request_json(request, &format!("create {}", self.table))
            .await?;
        serde_json::from_value(body).map_err(|e| StoreError::Deserialize {
            context: format!("create {}", self.table),
            source: e,
        })
    }

    async fn contains(&self, filter: &[(&str, &str)]) -> Result<bool, StoreError> {
        let found = self.query(&formula::equality(filter), Some(1)).await?;
        Ok(!found.is_empty())
    }
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("api_key", &"[redacted]")
            .field("table", &self.table)
            .field("table_url", &self.table_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str, table: &str) -> AirtableClient {
        AirtableClient::with_base_url("pat-test", "appBASE", table, 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn table_url_appends_base_and_table() {
        let client = test_client("https://api.airtable.com/v0", "Uplaud");
        assert_eq!(
            client.table_url.as_str(),
            "https://api.airtable.com/v0/appBASE/Uplaud"
        );
    }

    #[test]
    fn table_name_is_percent_encoded() {
        let client = test_client("https://api.airtable.com/v0/", "Reviews 2024/Q1");
        assert_eq!(
            client.table_url.as_str(),
            "https://api.airtable.com/v0/appBASE/Reviews%202024%2FQ1"
        );
    }

    #[test]
    fn build_url_encodes_formula() {
        let client = test_client("https://api.airtable.com/v0", "Uplaud");
        let url = client.build_url(&[("filterByFormula", "{City}='Pune'")]);
        let (key, value) = url.query_pairs().next().expect("query pair");
        assert_eq!(key, "filterByFormula");
        assert_eq!(value, "{City}='Pune'");
        assert!(!url.as_str().contains('{'), "formula should be encoded: {url}");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = AirtableClient::with_base_url("k", "b", "t", 30, "not a url");
        assert!(matches!(result, Err(StoreError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = test_client("https://api.airtable.com/v0", "Uplaud");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("pat-test"));
    }

    #[test]
    fn api_error_message_shapes() {
        assert_eq!(
            api_error_message(r#"{"error":{"type":"INVALID_PERMISSIONS","message":"nope"}}"#),
            "nope"
        );
        assert_eq!(api_error_message(r#"{"error":"NOT_FOUND"}"#), "NOT_FOUND");
        assert_eq!(api_error_message("bad gateway"), "bad gateway");
        assert_eq!(api_error_message(""), "empty response body");
    }
}
