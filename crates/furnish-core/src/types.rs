//! Record and draft types shared by every master-data resource

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Field name the backend uses for the record identifier
pub const ID_FIELD: &str = "id";

/// Backend-assigned record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Raw integer value
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for RecordId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| crate::Error::validation(ID_FIELD, format!("'{s}' is not an id: {e}")))
    }
}

/// Anything that carries a backend identifier
pub trait Identifiable {
    /// Identifier of this item
    fn id(&self) -> RecordId;
}

/// A master-data record as returned by the backend
///
/// The identifier sits next to the resource fields on the wire:
/// `{"id": 1, "name": "Oak"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Backend-assigned identifier
    pub id: RecordId,

    /// Remaining fields, in server order
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record from an identifier and its fields
    pub fn new(id: impl Into<RecordId>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a record from a JSON object such as `{"id": 1, "name": "Oak"}`
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the value is not an object with an integer `id`.
    pub fn from_json(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Field value, if present
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl Identifiable for Record {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// In-progress, unsaved copy of a record's fields
///
/// A draft never carries the identifier; the backend assigns it on create
/// and update addresses it through the URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(Map<String, Value>);

impl Draft {
    /// Empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the previous value
    ///
    /// # Errors
    ///
    /// Returns a validation error when asked to set the identifier.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> crate::Result<Option<Value>> {
        let field = field.into();
        if field == ID_FIELD {
            return Err(crate::Error::validation(
                ID_FIELD,
                "identifier is assigned by the server",
            ));
        }
        Ok(self.0.insert(field, value))
    }

    /// Draft built from schema field values; an `id` entry is dropped
    pub(crate) fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Self(
            fields
                .into_iter()
                .filter(|(field, _)| *field != ID_FIELD)
                .map(|(field, value)| (field.to_string(), value))
                .collect(),
        )
    }

    /// Field value, if present
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the draft has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Map<String, Value>> for Draft {
    type Error = crate::Error;

    fn try_from(map: Map<String, Value>) -> crate::Result<Self> {
        let mut draft = Self::new();
        for (field, value) in map {
            draft.insert(field, value)?;
        }
        Ok(draft)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_record_flattens_id_next_to_fields() {
        let record = Record::from_json(json!({"id": 1, "name": "Oak", "status": true})).unwrap();

        assert_eq!(record.id, RecordId(1));
        assert_eq!(record.get("name"), Some(&json!("Oak")));
        assert!(record.get(ID_FIELD).is_none());

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back, json!({"id": 1, "name": "Oak", "status": true}));
    }

    #[test]
    fn test_record_requires_id() {
        let err = Record::from_json(json!({"name": "Oak"})).unwrap_err();
        assert!(matches!(err, crate::Error::Serialization(_)));
    }

    #[test]
    fn test_record_keeps_server_field_order() {
        let record =
            Record::from_json(json!({"id": 3, "zeta": 1, "alpha": 2, "mid": null})).unwrap();
        let keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_draft_rejects_identifier() {
        let mut draft = Draft::new();

        assert!(draft.insert("id", json!(5)).is_err());
        assert!(draft.is_empty());
    }

    #[test]
    fn test_draft_serializes_as_plain_object() {
        let mut draft = Draft::new();
        draft.insert("name", json!("Maple")).unwrap();
        draft.insert("status", json!(true)).unwrap();

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"name": "Maple", "status": true})
        );
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn test_record_id_parsing() {
        assert_eq!(" 42 ".parse::<RecordId>().unwrap(), RecordId(42));
        assert!("forty".parse::<RecordId>().is_err());
        assert_eq!(RecordId(7).to_string(), "7");
    }
}
