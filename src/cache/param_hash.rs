//! Canonical, order-normalized structural hash of request parameters.
//!
//! Two structurally equal parameter values hash identically regardless of
//! the order object keys were inserted in; array element order is
//! significant. The digest is SHA-256 with type tags and length-prefixed
//! byte encoding (a bare concatenation would let `{"a": "bc"}` and
//! `{"ab": "c"}` collide), truncated to a `u64` store key. Collisions
//! between structurally different inputs are a theoretical risk accepted by
//! the design.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_NUMBER: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_ARRAY: u8 = 4;
const TAG_OBJECT: u8 = 5;

/// Hash any JSON value to its canonical `u64` key.
pub fn param_hash(value: &Value) -> u64 {
    truncate(digest(value))
}

/// Hash a parameter mapping without wrapping it in a [`Value`] first.
pub fn params_hash(params: &Map<String, Value>) -> u64 {
    truncate(digest_object(params))
}

fn truncate(digest: [u8; 32]) -> u64 {
    let mut key = [0u8; 8];
    key.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(key)
}

fn digest(value: &Value) -> [u8; 32] {
    match value {
        Value::Object(map) => digest_object(map),
        Value::Array(items) => {
            let mut hasher = Sha256::new();
            hasher.update([TAG_ARRAY]);
            hasher.update((items.len() as u64).to_le_bytes());
            // Element order is significant for sequences.
            for item in items {
                hasher.update(digest(item));
            }
            hasher.finalize().into()
        }
        Value::Null => {
            let mut hasher = Sha256::new();
            hasher.update([TAG_NULL]);
            hasher.finalize().into()
        }
        Value::Bool(b) => {
            let mut hasher = Sha256::new();
            hasher.update([TAG_BOOL, u8::from(*b)]);
            hasher.finalize().into()
        }
        Value::Number(n) => {
            let mut hasher = Sha256::new();
            hasher.update([TAG_NUMBER]);
            update_bytes(&mut hasher, n.to_string().as_bytes());
            hasher.finalize().into()
        }
        Value::String(s) => {
            let mut hasher = Sha256::new();
            hasher.update([TAG_STRING]);
            update_bytes(&mut hasher, s.as_bytes());
            hasher.finalize().into()
        }
    }
}

fn digest_object(map: &Map<String, Value>) -> [u8; 32] {
    // Hash each value first, then sort (key, digest) pairs by key so the
    // result is independent of insertion order.
    let mut pairs: Vec<(&str, [u8; 32])> = map
        .iter()
        .map(|(key, value)| (key.as_str(), digest(value)))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Sha256::new();
    hasher.update([TAG_OBJECT]);
    hasher.update((pairs.len() as u64).to_le_bytes());
    for (key, value_digest) in pairs {
        update_bytes(&mut hasher, key.as_bytes());
        hasher.update(value_digest);
    }
    hasher.finalize().into()
}

fn update_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_is_deterministic() {
        let value = json!({"email": ["jane@x.com"], "min_likelihood": 6});
        assert_eq!(param_hash(&value), param_hash(&value));
    }

    #[test]
    fn test_hash_is_key_order_independent() {
        // Build the same mapping with reversed insertion order.
        let mut forward = Map::new();
        forward.insert("a".to_string(), json!(1));
        forward.insert("b".to_string(), json!({"x": [1, 2], "y": null}));
        let mut backward = Map::new();
        backward.insert("b".to_string(), json!({"y": null, "x": [1, 2]}));
        backward.insert("a".to_string(), json!(1));
        assert_eq!(params_hash(&forward), params_hash(&backward));
    }

    #[test]
    fn test_sequence_order_is_significant() {
        let ab = json!(["a", "b"]);
        let ba = json!(["b", "a"]);
        assert_ne!(param_hash(&ab), param_hash(&ba));
    }

    #[test]
    fn test_different_values_hash_differently() {
        assert_ne!(
            param_hash(&json!({"email": ["a@x.com"]})),
            param_hash(&json!({"email": ["b@x.com"]}))
        );
    }

    #[test]
    fn test_different_keys_hash_differently() {
        assert_ne!(
            param_hash(&json!({"email": ["a@x.com"]})),
            param_hash(&json!({"phone": ["a@x.com"]}))
        );
    }

    #[test]
    fn test_scalar_types_are_distinguished() {
        assert_ne!(param_hash(&json!("1")), param_hash(&json!(1)));
        assert_ne!(param_hash(&json!(null)), param_hash(&json!(false)));
        assert_ne!(param_hash(&json!(true)), param_hash(&json!(false)));
    }

    #[test]
    fn test_nesting_is_not_flattened() {
        // [[1], 2] and [1, [2]] must not collide via concatenation.
        assert_ne!(param_hash(&json!([[1], 2])), param_hash(&json!([1, [2]])));
    }

    #[test]
    fn test_key_value_boundary_is_length_prefixed() {
        assert_ne!(
            param_hash(&json!({"ab": "c"})),
            param_hash(&json!({"a": "bc"}))
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_ne!(param_hash(&json!({})), param_hash(&json!([])));
        assert_eq!(param_hash(&json!({})), param_hash(&json!({})));
    }

    #[test]
    fn test_map_and_value_entry_points_agree() {
        let mut map = Map::new();
        map.insert("email".to_string(), json!(["jane@x.com"]));
        assert_eq!(params_hash(&map), param_hash(&Value::Object(map.clone())));
    }
}
