//! JSON-in-a-text-column codec used for destination chains, custom location
//! lists and checklist labels.

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Decodes a stored JSON array. NULL, blank or malformed text yields an empty list.
pub fn decode<T: DeserializeOwned>(raw: Option<&str>) -> Vec<T> {
    let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<T>>(text) {
        Ok(items) => items,
        Err(err) => {
            debug!(error = %err, raw = text, "discarding malformed JSON list");
            Vec::new()
        }
    }
}

/// Encodes a list for storage. Empty lists are stored as NULL.
pub fn encode<T: Serialize>(items: &[T]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    match serde_json::to_string(items) {
        Ok(text) => Some(text),
        Err(err) => {
            debug!(error = %err, "failed to encode JSON list");
            None
        }
    }
}

/// Whether an encoded integer chain contains `id`, using the same four shapes
/// the SQL LIKE lookup matches.
pub fn chain_contains(raw: Option<&str>, id: i32) -> bool {
    decode::<i32>(raw).contains(&id)
}

/// LIKE patterns that match `id` anywhere in a compact JSON integer array.
pub fn chain_like_patterns(id: i32) -> [String; 4] {
    [
        format!("[{id}]"),
        format!("[{id},%"),
        format!("%,{id},%"),
        format!("%,{id}]"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_encodes_to_null() {
        assert_eq!(encode::<i32>(&[]), None);
    }

    #[test]
    fn encodes_compact_arrays() {
        assert_eq!(encode(&[3, 14, 15]).as_deref(), Some("[3,14,15]"));
    }

    #[test]
    fn malformed_and_blank_input_decode_to_empty() {
        assert!(decode::<i32>(None).is_empty());
        assert!(decode::<i32>(Some("   ")).is_empty());
        assert!(decode::<i32>(Some("[1, two]")).is_empty());
        assert!(decode::<i32>(Some("{\"a\":1}")).is_empty());
    }

    #[test]
    fn like_patterns_cover_every_position() {
        let patterns = chain_like_patterns(7);
        assert_eq!(patterns, ["[7]", "[7,%", "%,7,%", "%,7]"].map(String::from));
        assert!(chain_contains(Some("[1,7,9]"), 7));
        assert!(!chain_contains(Some("[17,70]"), 7));
    }

    #[test]
    fn decodes_string_lists() {
        let names: Vec<String> = decode(Some(r#"["Bench","Cage"]"#));
        assert_eq!(names, vec!["Bench".to_string(), "Cage".to_string()]);
    }
}
