//! In-memory query store and the result-matching engine.
//!
//! The store maps canonical parameter hashes to completed [`Response`]s and
//! preserves insertion order, which is the iteration order of the field
//! scan. Entries live for the whole process; a narrowing event may rewrite
//! an entry's `query` in place, under the same key.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::cache::param_hash::params_hash;
use crate::models::{Person, Response};

/// Correlating identity fields the field scan understands.
///
/// Each variant pairs a request-parameter key with typed extraction of that
/// field from stored responses. New correlating fields (phone, profile
/// handles, ...) are added here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    /// Matches on email addresses.
    Email,
}

impl MatchField {
    /// Resolve a request-parameter key to a supported field.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    /// The request-parameter key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Self::Email => "email",
        }
    }

    /// Values of this field embedded in a stored person record, most
    /// recently seen first.
    fn person_values(self, person: &Person) -> Vec<String> {
        match self {
            Self::Email => person
                .get_emails(None, true, true)
                .into_iter()
                .filter_map(|email| email.address)
                .collect(),
        }
    }

    /// The field value recorded in a stored query. A list-valued recorded
    /// field uses its first element.
    fn recorded_value(self, query: &Map<String, Value>) -> Option<String> {
        let value = query.get(self.key())?;
        let scalar = match value {
            Value::Array(items) => items.first()?,
            other => other,
        };
        scalar.as_str().map(str::to_string)
    }
}

/// Requested values for one parameter key, as strings.
fn requested_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Process-lifetime mapping from canonical hash to stored [`Response`].
#[derive(Debug, Default)]
pub struct QueryStore {
    entries: IndexMap<u64, Response>,
}

impl QueryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored responses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no responses are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if a response is stored under `hash`.
    pub fn contains(&self, hash: u64) -> bool {
        self.entries.contains_key(&hash)
    }

    /// The response stored under `hash`, if any.
    pub fn get(&self, hash: u64) -> Option<&Response> {
        self.entries.get(&hash)
    }

    /// Store a response under `hash`. An existing entry is overwritten in
    /// place, keeping its position in the scan order.
    pub fn insert(&mut self, hash: u64, response: Response) {
        self.entries.insert(hash, response);
    }

    /// Bulk-merge responses into the store.
    pub fn save<I>(&mut self, responses: I)
    where
        I: IntoIterator<Item = (u64, Response)>,
    {
        for (hash, response) in responses {
            self.insert(hash, response);
        }
    }

    /// Rewrite a stored entry's `query` to the single field/value pair that
    /// matched it. Explicit write-back so the mutation is visible and
    /// testable rather than a side effect of the read path.
    pub fn narrow_query(&mut self, hash: u64, field: MatchField, value: &str) {
        if let Some(entry) = self.entries.get_mut(&hash) {
            debug!(hash, field = field.key(), value, "narrowing stored query");
            let mut query = Map::new();
            query.insert(field.key().to_string(), Value::String(value.to_string()));
            entry.query = query;
        }
    }

    /// Find stored responses that already answer `params`.
    ///
    /// Exact-hash lookup first, then a linear field scan over entries in
    /// insertion order, for every requested key that resolves to a
    /// [`MatchField`]. Each stored entry joins the result at most once, and
    /// accumulation stops once `limit` is reached. `only_person` restricts
    /// the scan to person-shaped (`Some(true)`) or error-shaped
    /// (`Some(false)`) entries.
    ///
    /// A match against a person's own embedded field whose stored `query`
    /// is empty narrows that query to the matched value and persists the
    /// rewrite under the same hash.
    pub fn find_matches(
        &mut self,
        params: &Map<String, Value>,
        limit: Option<usize>,
        only_person: Option<bool>,
    ) -> Vec<Response> {
        let cap = limit.unwrap_or(usize::MAX);
        if cap == 0 {
            return Vec::new();
        }

        let mut matched: Vec<u64> = Vec::new();
        let mut narrowings: Vec<(u64, MatchField, String)> = Vec::new();

        // Shared by the exact-hash branch and the field scan.
        let passes_filter = |stored: &Response| match only_person {
            Some(true) => !stored.is_error(),
            Some(false) => !stored.is_person(),
            None => true,
        };

        let exact = params_hash(params);
        if self.entries.get(&exact).is_some_and(|stored| passes_filter(stored)) {
            debug!(hash = exact, "exact cache hit");
            matched.push(exact);
        }

        'scan: for (key, requested) in params {
            if matched.len() >= cap {
                break;
            }
            let Some(field) = MatchField::from_key(key) else {
                continue;
            };
            let wanted = requested_values(requested);
            if wanted.is_empty() {
                continue;
            }

            for (&hash, stored) in &self.entries {
                if matched.len() >= cap {
                    break 'scan;
                }
                if matched.contains(&hash) {
                    continue;
                }
                if !passes_filter(stored) {
                    continue;
                }

                // (a) the field values embedded in the stored person record
                if let Some(person) = &stored.person {
                    let hit = field
                        .person_values(person)
                        .into_iter()
                        .find(|candidate| wanted.iter().any(|w| w == candidate));
                    if let Some(value) = hit {
                        if stored.query.is_empty() {
                            narrowings.push((hash, field, value));
                        }
                        matched.push(hash);
                        continue;
                    }
                }

                // (b) the field value recorded in the stored query
                if let Some(recorded) = field.recorded_value(&stored.query) {
                    if wanted.iter().any(|w| *w == recorded) {
                        matched.push(hash);
                    }
                }
            }
        }

        for (hash, field, value) in narrowings {
            self.narrow_query(hash, field, &value);
        }

        matched
            .iter()
            .filter_map(|hash| self.entries.get(hash).cloned())
            .collect()
    }
}
