//! Request memoization: canonical parameter hashing, the query store, and
//! the result-matching engine.

pub mod param_hash;
pub mod store;

pub use param_hash::{param_hash, params_hash};
pub use store::{MatchField, QueryStore};
