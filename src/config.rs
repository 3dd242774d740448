//! Environment-based settings.
//!
//! All variables carry a `PDL_` prefix. A `.env` file in the working
//! directory is honored via `dotenvy`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PdlError, Result};

/// Which PDL person endpoint a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
    /// `/person/enrich` — one person per request (default).
    #[default]
    Enrich,
    /// `/person/search` — Elasticsearch-style query.
    Search,
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enrich => f.write_str("enrich"),
            Self::Search => f.write_str("search"),
        }
    }
}

impl FromStr for ApiType {
    type Err = PdlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enrich" => Ok(Self::Enrich),
            "search" => Ok(Self::Search),
            other => Err(PdlError::Config(format!(
                "unknown query type '{other}' (expected 'enrich' or 'search')"
            ))),
        }
    }
}

/// Client settings, normally loaded from the environment.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// PDL API key, sent as the `X-Api-Key` header.
    pub api_key: String,
    /// Endpoint selection for the HTTP fetcher.
    pub query_type: ApiType,
}

impl Settings {
    /// Load settings from `PDL_API_KEY` and `PDL_QUERY_TYPE`.
    ///
    /// A missing API key yields an empty string rather than an error, so
    /// offline/test construction stays cheap; an unparseable query type is
    /// a configuration error.
    pub fn from_env() -> Result<Self> {
        // Best-effort .env load; absence is not an error.
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("PDL_API_KEY").unwrap_or_default();
        let query_type = match std::env::var("PDL_QUERY_TYPE") {
            Ok(v) if !v.is_empty() => v.parse()?,
            _ => ApiType::default(),
        };

        Ok(Self {
            api_key,
            query_type,
        })
    }

    /// Build settings with an explicit key and the default query type.
    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            query_type: ApiType::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_type_default_is_enrich() {
        assert_eq!(ApiType::default(), ApiType::Enrich);
    }

    #[test]
    fn test_api_type_parse_roundtrip() {
        for api in [ApiType::Enrich, ApiType::Search] {
            let parsed: ApiType = api.to_string().parse().unwrap();
            assert_eq!(parsed, api);
        }
    }

    #[test]
    fn test_api_type_parse_is_case_insensitive() {
        let parsed: ApiType = "SEARCH".parse().unwrap();
        assert_eq!(parsed, ApiType::Search);
    }

    #[test]
    fn test_api_type_parse_rejects_unknown() {
        let result = "bulk".parse::<ApiType>();
        assert!(matches!(result, Err(PdlError::Config(_))));
    }

    #[test]
    fn test_api_type_serde_form() {
        let encoded = serde_json::to_string(&ApiType::Search).unwrap();
        assert_eq!(encoded, "\"search\"");
        let decoded: ApiType = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, ApiType::Search);
    }

    #[test]
    fn test_with_api_key() {
        let settings = Settings::with_api_key("test-key");
        assert_eq!(settings.api_key, "test-key");
        assert_eq!(settings.query_type, ApiType::Enrich);
    }
}
