//! Deterministic content hashing for identity and change detection.

use std::hash::Hasher;

use serde_json::Value;
use twox_hash::XxHash64;

/// Hash a payload into a short deterministic digest.
///
/// `serde_json` keeps object keys sorted, so structurally identical
/// payloads serialize identically and repeated loads of unchanged
/// content produce the same digest across processes. Only practical
/// distinctness is needed, not collision resistance.
#[must_use]
pub fn content_digest(value: &Value) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(value.to_string().as_bytes());
    format!("{:016x}", hasher.finish())
}

/// Derive a stable item id: explicit id field, then slug, then a
/// content hash as the last resort. Never fails, and is deterministic
/// for unchanged input.
#[must_use]
pub fn stable_id(value: &Value) -> String {
    if let Some(id) = value
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
    {
        return id.to_string();
    }
    if let Some(slug) = value
        .get("slug")
        .and_then(Value::as_str)
        .filter(|slug| !slug.is_empty())
    {
        return slug.to_string();
    }
    content_digest(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let value = json!({"title": "Hello", "views": 42, "tags": ["rust"]});
        assert_eq!(content_digest(&value), content_digest(&value));
        assert_eq!(content_digest(&value), content_digest(&value.clone()));
    }

    #[test]
    fn digest_distinguishes_different_payloads() {
        let a = json!({"title": "Hello"});
        let b = json!({"title": "Hello!"});
        assert_ne!(content_digest(&a), content_digest(&b));
    }

    #[test]
    fn digest_ignores_source_key_order() {
        // serde_json sorts object keys, so parse order cannot matter.
        let a: Value = serde_json::from_str(r#"{"a": 1, "b": 2}"#).expect("json");
        let b: Value = serde_json::from_str(r#"{"b": 2, "a": 1}"#).expect("json");
        assert_eq!(content_digest(&a), content_digest(&b));
    }

    #[test]
    fn stable_id_prefers_id_then_slug_then_hash() {
        assert_eq!(stable_id(&json!({"id": "p1", "slug": "hello"})), "p1");
        assert_eq!(stable_id(&json!({"id": "", "slug": "hello"})), "hello");

        let anonymous = json!({"title": "no identity"});
        assert_eq!(stable_id(&anonymous), content_digest(&anonymous));
    }
}
