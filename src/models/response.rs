//! The outcome of one person lookup.
//!
//! A completed [`Response`] carries exactly one of `person`/`error`, plus
//! the query that produced (or later matched) it. Raw API bodies keep the
//! payload under a `"data"` key; [`Response::from_api`] folds that into the
//! right slot based on the reported status.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PdlError, Result};
use crate::models::person::Person;

/// The error payload of an unsuccessful (but recoverable) lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// The error type reported by the API, e.g. "not_found".
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable error message.
    pub message: String,
}

/// The response from the API, extended with the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The person data, if the lookup succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    /// The error payload, if the lookup recorded an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    /// Status code reported by the API.
    pub status: u16,
    /// Dataset version; only present on successful responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_version: Option<String>,
    /// Match likelihood; only present on successful responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<i64>,
    /// The request parameters. May be narrowed after a partial match.
    #[serde(default)]
    pub query: Map<String, Value>,
    /// When this response was recorded.
    #[serde(default = "Utc::now")]
    pub query_time: DateTime<Utc>,
    /// Any fields the API sent that this schema does not model.
    #[serde(flatten)]
    pub additional_data: Map<String, Value>,
}

impl Response {
    /// Build a response from a raw API body.
    ///
    /// The payload arrives under `"data"` and is classified into `person`
    /// (status 200) or `error` (anything else). Bodies that already carry a
    /// `person`/`error` slot alongside `data` are rejected — that shape is
    /// ambiguous.
    pub fn from_api(query: Map<String, Value>, raw: Value) -> Result<Self> {
        let Value::Object(mut body) = raw else {
            return Err(PdlError::Payload(serde_json::Error::custom(
                "response body is not a JSON object",
            )));
        };

        if let Some(data) = body.remove("data") {
            if body.contains_key("person") || body.contains_key("error") {
                return Err(PdlError::Payload(serde_json::Error::custom(
                    "response body has both 'data' and 'person'/'error' keys",
                )));
            }
            let is_person = body.get("status").and_then(Value::as_u64) == Some(200);
            let slot = if is_person { "person" } else { "error" };
            body.insert(slot.to_string(), data);
        }

        body.insert("query".to_string(), Value::Object(query));

        let response: Response = serde_json::from_value(Value::Object(body))?;
        if response.person.is_some() && response.error.is_some() {
            return Err(PdlError::Payload(serde_json::Error::custom(
                "response carries both a person and an error payload",
            )));
        }
        Ok(response)
    }

    /// `true` when this response carries person data.
    pub fn is_person(&self) -> bool {
        self.person.is_some()
    }

    /// `true` when this response carries an error payload.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The person payload, or [`PdlError::MissingPayload`] if absent.
    pub fn require_person(&self) -> Result<&Person> {
        self.person
            .as_ref()
            .ok_or(PdlError::MissingPayload("person"))
    }

    /// The error payload, or [`PdlError::MissingPayload`] if absent.
    pub fn require_error(&self) -> Result<&ErrorDetail> {
        self.error.as_ref().ok_or(PdlError::MissingPayload("error"))
    }
}
