//! Fact Store schema and tool payloads.

use serde::{Deserialize, Serialize};

/// Table holding every remembered fact
pub const FACTS_TABLE: &str = "memories";

/// A single remembered key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Lookup key, case-sensitive as typed by the caller
    pub key: String,
    pub value: String,
}

impl Fact {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Payload returned by a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Always "saved"
    pub status: String,
    pub key: String,
    pub value: String,
}

impl From<Fact> for SaveReceipt {
    fn from(fact: Fact) -> Self {
        Self {
            status: "saved".to_string(),
            key: fact.key,
            value: fact.value,
        }
    }
}

/// Payload returned by a lookup; `value` is `null` when the key was never saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactLookup {
    pub key: String,
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_receipt_shape() {
        let receipt = SaveReceipt::from(Fact::new("favorite color", "blue"));
        assert_eq!(
            serde_json::to_value(&receipt).unwrap(),
            json!({"status": "saved", "key": "favorite color", "value": "blue"})
        );
    }

    #[test]
    fn test_missing_value_is_null_not_empty() {
        let lookup = FactLookup {
            key: "cat's name".to_string(),
            value: None,
        };
        assert_eq!(
            serde_json::to_value(&lookup).unwrap(),
            json!({"key": "cat's name", "value": null})
        );

        let empty = FactLookup {
            key: "nickname".to_string(),
            value: Some(String::new()),
        };
        assert_eq!(serde_json::to_value(&empty).unwrap()["value"], json!(""));
    }
}
