//! Typed People Data Labs person lookup client with request memoization.
//!
//! Repeated lookups for equivalent parameters — or lookups satisfiable from
//! previously seen results — never re-issue network calls. The cache keys
//! requests by an order-normalized structural hash, and a field-scan match
//! engine lets a new query be answered by an earlier response whose person
//! record carries the requested identity field (currently: email).
//!
//! ```no_run
//! use pdl_client::{PersonClient, Settings};
//!
//! fn main() -> pdl_client::Result<()> {
//!     let mut client = PersonClient::new(Settings::from_env()?);
//!     let response = client.get_person_via_email("jane@x.com")?;
//!     if let Ok(person) = response.require_person() {
//!         println!("{:?}", person.full_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;

pub use cache::{param_hash, params_hash, MatchField, QueryStore};
pub use client::PersonClient;
pub use config::{ApiType, Settings};
pub use error::{PdlError, Result};
pub use fetch::{HttpFetcher, PersonFetch};
pub use models::{Email, EmailFilter, ErrorDetail, Experience, Person, Response};
