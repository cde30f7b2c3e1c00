//! Deterministic hashing for content-addressed tiling handles.
//!
//! Uses Blake3 over a canonicalized JSON form so that identical requests
//! produce identical handles across platforms and runs.

use serde::Serialize;

/// Compute the handle for any serializable request record.
///
/// Guarantees: same request → same handle; key order and whitespace in the
/// incoming form never matter.
pub fn handle_for<T: Serialize>(value: &T) -> String {
    let mut canonical = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
    canonicalize_value(&mut canonical);
    let json = serde_json::to_string(&canonical).unwrap_or_default();
    let hash = blake3::hash(json.as_bytes());
    format!("tiling_{}", &hash.to_hex()[..16])
}

/// Recursively sort object keys for deterministic ordering.
fn canonicalize_value(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            // serde_json maps preserve insertion order by default; rebuild sorted
            let mut entries: Vec<(String, serde_json::Value)> = std::mem::take(map)
                .into_iter()
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut inner) in entries {
                canonicalize_value(&mut inner);
                map.insert(key, inner);
            }
        }
        serde_json::Value::Array(arr) => {
            for inner in arr.iter_mut() {
                canonicalize_value(inner);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Probe {
        kind: &'static str,
        unit: f64,
    }

    #[test]
    fn test_deterministic_handles() {
        let a = Probe { kind: "hexagonal", unit: 1.0 };
        let b = Probe { kind: "hexagonal", unit: 1.0 };
        assert_eq!(handle_for(&a), handle_for(&b));
        assert!(handle_for(&a).starts_with("tiling_"));
    }

    #[test]
    fn test_different_requests_different_handles() {
        let a = Probe { kind: "hexagonal", unit: 1.0 };
        let b = Probe { kind: "hexagonal", unit: 2.0 };
        assert_ne!(handle_for(&a), handle_for(&b));
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let a: serde_json::Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        assert_eq!(handle_for(&a), handle_for(&b));
    }
}
