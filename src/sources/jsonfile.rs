//! Flat JSON object format: `{"KEY": "VALUE", ...}`.
//!
//! Only string values are accepted. Keys must be valid variable names.
//! Variables come out in document order.

use indexmap::IndexMap;

use super::DecodeError;
use crate::models::EnvVar;

/// Decode a flat JSON object of strings into variables.
pub fn decode_json(raw: &[u8]) -> Result<Vec<EnvVar>, DecodeError> {
    let map: IndexMap<String, String> = serde_json::from_slice(raw).map_err(DecodeError::Json)?;
    map.into_iter()
        .enumerate()
        .map(|(idx, (key, value))| {
            if !EnvVar::is_valid_key(&key) {
                return Err(DecodeError::InvalidKey { entry: idx + 1 });
            }
            Ok(EnvVar::new(key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_flat_object() {
        let vars = decode_json(br#"{"MAGIC": "5"}"#).unwrap();
        assert_eq!(vars, vec![EnvVar::new("MAGIC", "5")]);
    }

    #[test]
    fn decode_preserves_document_order() {
        let vars = decode_json(br#"{"Z": "1", "A": "2", "M": "3"}"#).unwrap();
        let keys: Vec<_> = vars.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["Z", "A", "M"]);
    }

    #[test]
    fn decode_rejects_non_string_values() {
        assert!(decode_json(br#"{"MAGIC": 5}"#).is_err());
        assert!(decode_json(br#"{"NESTED": {"A": "B"}}"#).is_err());
    }

    #[test]
    fn decode_rejects_non_object() {
        assert!(decode_json(br#"["A", "B"]"#).is_err());
        assert!(decode_json(b"not json").is_err());
    }

    #[test]
    fn decode_rejects_empty_key() {
        let err = decode_json(br#"{"A": "1", "": "x"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidKey { entry: 2 }));
    }

    #[test]
    fn decode_rejects_key_with_equals_or_nul() {
        let err = decode_json(br#"{"A=B": "y"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidKey { entry: 1 }));
        assert!(!err.to_string().contains("A=B"));

        let err = decode_json(br#"{"OK": "1", "NUL\u0000KEY": "z"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidKey { entry: 2 }));
    }

    #[test]
    fn decode_empty_object() {
        assert!(decode_json(b"{}").unwrap().is_empty());
    }
}
