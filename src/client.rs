//! The lookup service: hash → match → fetch → classify → store → return.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::cache::{params_hash, QueryStore};
use crate::config::Settings;
use crate::error::{PdlError, Result};
use crate::fetch::{HttpFetcher, PersonFetch};
use crate::models::Response;

/// Error subtype on a 404 body that is treated as a recoverable miss.
const NOT_FOUND_TYPE: &str = "not_found";

/// A memoizing person-lookup client.
///
/// Owns its [`QueryStore`] outright — one cache per client instance, with
/// single-writer semantics. Lookups are synchronous and blocking; callers
/// needing concurrency run one client per worker or serialize access
/// externally.
pub struct PersonClient {
    settings: Settings,
    fetcher: Box<dyn PersonFetch>,
    store: QueryStore,
}

impl std::fmt::Debug for PersonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonClient")
            .field("query_type", &self.settings.query_type)
            .field("cached_queries", &self.store.len())
            .finish()
    }
}

impl PersonClient {
    /// Build a client backed by the HTTP fetcher.
    pub fn new(settings: Settings) -> Self {
        let fetcher = HttpFetcher::new(settings.clone());
        Self::with_fetcher(settings, Box::new(fetcher))
    }

    /// Build a client from the environment (`PDL_`-prefixed variables).
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Settings::from_env()?))
    }

    /// Build a client with an explicit fetch collaborator.
    pub fn with_fetcher(settings: Settings, fetcher: Box<dyn PersonFetch>) -> Self {
        Self {
            settings,
            fetcher,
            store: QueryStore::new(),
        }
    }

    /// The query store, for inspection.
    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    /// Find stored responses that already answer `params`. See
    /// [`QueryStore::find_matches`].
    pub fn find_matches(
        &mut self,
        params: &Map<String, Value>,
        limit: Option<usize>,
        only_person: Option<bool>,
    ) -> Vec<Response> {
        self.store.find_matches(params, limit, only_person)
    }

    /// Find one stored response that answers `params`, if any.
    pub fn find_match(&mut self, params: &Map<String, Value>) -> Option<Response> {
        self.store.find_matches(params, Some(1), None).pop()
    }

    /// Look up a person. The API accepts multiple matches internally; this
    /// client resolves one response per call.
    ///
    /// With `use_cache`, a stored response matching `params` (exactly or via
    /// the field scan) is returned unchanged without a fetch, and a fetched
    /// response is stored under the canonical hash of `params`. Status 402
    /// and unrecognized non-200 statuses propagate as errors and cache
    /// nothing; a 404 with error type `not_found` becomes an error-shaped
    /// response and is cached like a success.
    pub fn get_person(&mut self, params: Map<String, Value>, use_cache: bool) -> Result<Response> {
        let hash = params_hash(&params);

        if use_cache {
            if let Some(existing) = self.find_match(&params) {
                debug!(hash, "lookup satisfied from cache");
                return Ok(existing);
            }
        }

        let raw = self.fetcher.fetch(&params)?;
        // A missing or out-of-range status classifies as 0, never as a
        // truncated success.
        let status = raw
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(0);

        let response = if status == 200 {
            Response::from_api(params, raw)?
        } else {
            let message = raw
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if status == 402 {
                warn!("account limit reached: {}", message);
                return Err(PdlError::AccountLimit {
                    message,
                    response: raw,
                });
            }
            let error_type = raw.pointer("/error/type").and_then(Value::as_str);
            if status == 404 && error_type == Some(NOT_FOUND_TYPE) {
                Response::from_api(params, raw)?
            } else {
                return Err(PdlError::UnknownApi {
                    status,
                    message,
                    response: raw,
                });
            }
        };

        // A recoverable miss is recorded regardless of the caller's cache
        // preference so repeat lookups stay local.
        if use_cache || response.is_error() {
            self.store.insert(hash, response.clone());
        }

        Ok(response)
    }

    /// Look up a person by a single email address.
    pub fn get_person_via_email(&mut self, address: &str) -> Result<Response> {
        let mut params = Map::new();
        params.insert("email".to_string(), json!([address]));
        self.get_person(params, true)
    }
}
