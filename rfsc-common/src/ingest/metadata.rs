//! Metadata section parsing (section 1 of the export)

use serde::Serialize;
use std::collections::HashMap;

use super::normalize::{split_fields, FIELD_SEPARATOR};

/// Value of one metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// `key;value`
    Scalar(String),
    /// `key;value;unit`
    WithUnit { value: String, unit: String },
}

impl MetadataValue {
    /// Value text, without unit
    pub fn value(&self) -> &str {
        match self {
            MetadataValue::Scalar(value) => value,
            MetadataValue::WithUnit { value, .. } => value,
        }
    }

    /// Unit text, if the line carried one
    pub fn unit(&self) -> Option<&str> {
        match self {
            MetadataValue::Scalar(_) => None,
            MetadataValue::WithUnit { unit, .. } => Some(unit),
        }
    }
}

/// Metadata entries keyed by the label found in the export
///
/// Immutable once parsed. Duplicate labels keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: HashMap<String, MetadataValue>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.entries.iter()
    }
}

/// Parse the metadata section
///
/// Lines with three fields become `key -> (value, unit)`, two fields become
/// `key -> value`. Lines without a separator or with any other field count
/// are skipped.
pub fn parse_metadata(text: &str) -> Metadata {
    let mut entries = HashMap::new();

    for line in text.lines() {
        if !line.contains(FIELD_SEPARATOR) {
            continue;
        }

        match split_fields(line).as_slice() {
            [key, value, unit] => {
                entries.insert(
                    key.trim().to_string(),
                    MetadataValue::WithUnit {
                        value: value.trim().to_string(),
                        unit: unit.trim().to_string(),
                    },
                );
            }
            [key, value] => {
                entries.insert(
                    key.trim().to_string(),
                    MetadataValue::Scalar(value.trim().to_string()),
                );
            }
            _ => {}
        }
    }

    Metadata { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_with_unit() {
        let metadata = parse_metadata("Bandwidth;10;MHz");
        assert_eq!(
            metadata.get("Bandwidth"),
            Some(&MetadataValue::WithUnit {
                value: "10".to_string(),
                unit: "MHz".to_string(),
            })
        );
    }

    #[test]
    fn test_scalar_value() {
        let metadata = parse_metadata("Operator;Acme");
        assert_eq!(
            metadata.get("Operator"),
            Some(&MetadataValue::Scalar("Acme".to_string()))
        );
    }

    #[test]
    fn test_other_field_counts_skipped() {
        let metadata = parse_metadata("A;B;C;D\nNoSeparatorHere\nOperator;Acme");
        assert_eq!(metadata.len(), 1);
        assert!(metadata.get("A").is_none());
    }

    #[test]
    fn test_fields_trimmed_and_last_duplicate_wins() {
        let metadata = parse_metadata(" Span ; 5 ; GHz \nSpan;7;GHz");
        let span = metadata.get("Span").unwrap();
        assert_eq!(span.value(), "7");
        assert_eq!(span.unit(), Some("GHz"));
    }

    #[test]
    fn test_serializes_flat() {
        let metadata = parse_metadata("Operator;Acme\nBandwidth;10;MHz");
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["Operator"], "Acme");
        assert_eq!(json["Bandwidth"]["value"], "10");
        assert_eq!(json["Bandwidth"]["unit"], "MHz");
    }
}
