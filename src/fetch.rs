//! The fetch collaborator: one blocking `fetch(params) -> raw JSON` call.
//!
//! [`PersonFetch`] is the seam the lookup service talks through; tests plug
//! in mock implementations, production uses [`HttpFetcher`] against the PDL
//! v5 REST API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::{ApiType, Settings};
use crate::error::Result;

/// PDL v5 REST API base.
const PDL_API_BASE: &str = "https://api.peopledatalabs.com/v5";

/// Request timeout for person lookups.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking fetch capability consumed by the lookup service.
pub trait PersonFetch {
    /// Issue one lookup and return the raw JSON body.
    ///
    /// Implementations return the body even for non-2xx HTTP statuses — the
    /// API embeds `status` in the body, and classification happens in the
    /// lookup service, not here.
    fn fetch(&self, params: &Map<String, Value>) -> Result<Value>;
}

/// HTTP fetcher speaking the PDL person enrich/search endpoints.
pub struct HttpFetcher {
    settings: Settings,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("query_type", &self.settings.query_type)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpFetcher {
    /// Build a fetcher for the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            base_url: PDL_API_BASE.to_string(),
            client: Self::build_client(),
        }
    }

    /// Override the API base URL (local test servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_client() -> Client {
        Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client")
    }

    /// The full endpoint URL for the configured query type.
    fn endpoint_url(&self) -> String {
        match self.settings.query_type {
            ApiType::Enrich => format!("{}/person/enrich", self.base_url),
            ApiType::Search => format!("{}/person/search", self.base_url),
        }
    }
}

impl PersonFetch for HttpFetcher {
    fn fetch(&self, params: &Map<String, Value>) -> Result<Value> {
        let url = self.endpoint_url();
        debug!(%url, query_type = %self.settings.query_type, "person lookup request");

        let request = match self.settings.query_type {
            ApiType::Enrich => self.client.get(&url).query(&enrich_query_pairs(params)),
            ApiType::Search => self.client.post(&url).json(&Value::Object(params.clone())),
        };

        let response = request
            .header("X-Api-Key", &self.settings.api_key)
            .send()?;

        let http_status = response.status().as_u16();
        let mut body: Value = response.json()?;

        // The body normally reports its own status; fall back to the HTTP
        // status so classification always has one.
        if let Value::Object(map) = &mut body {
            if !map.contains_key("status") {
                map.insert("status".to_string(), json!(http_status));
            }
        }

        Ok(body)
    }
}

/// Flatten params into query pairs for the GET enrich endpoint.
///
/// List values are comma-joined, the form the enrich API accepts for
/// multi-valued fields.
fn enrich_query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::Array(items) => items
                    .iter()
                    .map(scalar_form)
                    .collect::<Vec<_>>()
                    .join(","),
                other => scalar_form(other),
            };
            (key.clone(), rendered)
        })
        .collect()
}

fn scalar_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrich_query_pairs_joins_lists() {
        let mut params = Map::new();
        params.insert("email".to_string(), json!(["a@x.com", "b@x.com"]));
        let pairs = enrich_query_pairs(&params);
        assert_eq!(pairs, vec![("email".to_string(), "a@x.com,b@x.com".to_string())]);
    }

    #[test]
    fn test_enrich_query_pairs_scalars_pass_through() {
        let mut params = Map::new();
        params.insert("name".to_string(), json!("Jane Doe"));
        params.insert("min_likelihood".to_string(), json!(6));
        let pairs = enrich_query_pairs(&params);
        assert!(pairs.contains(&("name".to_string(), "Jane Doe".to_string())));
        assert!(pairs.contains(&("min_likelihood".to_string(), "6".to_string())));
    }

    #[test]
    fn test_endpoint_url_enrich() {
        let fetcher = HttpFetcher::new(Settings::with_api_key("k"));
        assert_eq!(
            fetcher.endpoint_url(),
            "https://api.peopledatalabs.com/v5/person/enrich"
        );
    }

    #[test]
    fn test_endpoint_url_search() {
        let mut settings = Settings::with_api_key("k");
        settings.query_type = ApiType::Search;
        let fetcher = HttpFetcher::new(settings).with_base_url("http://localhost:9999/");
        assert_eq!(fetcher.endpoint_url(), "http://localhost:9999/person/search");
    }
}
