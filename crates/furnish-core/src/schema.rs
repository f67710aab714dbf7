//! Resource schemas: which fields a resource has and how form input maps onto them

use crate::types::{Draft, Record, RecordId};
use crate::{Error, Result};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// How a field is edited and encoded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free text, sent as a string
    Text,
    /// Numeric input accepting fractions
    Number,
    /// Numeric input accepting whole numbers only
    Integer,
    /// Checkbox
    Boolean,
    /// Optional foreign key; blank input clears it to `null`
    Reference,
    /// Select box restricted to the listed options (blank allowed)
    Choice(&'static [&'static str]),
}

/// Value a field takes in a fresh add-mode draft
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    /// String default
    Text(&'static str),
    /// Fractional default
    Number(f64),
    /// Whole number default
    Integer(i64),
    /// Checkbox default
    Bool(bool),
    /// `null`
    Null,
}

impl FieldDefault {
    /// JSON form of the default
    pub fn to_value(self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.to_string()),
            Self::Number(n) => Number::from_f64(n).map_or(Value::Null, Value::Number),
            Self::Integer(n) => Value::from(n),
            Self::Bool(b) => Value::Bool(b),
            Self::Null => Value::Null,
        }
    }
}

/// Resource whose records populate a field's select box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSource {
    /// REST path of the option resource; may be the owning resource itself
    pub path: &'static str,
    /// Record field shown as the option text
    pub label: &'static str,
}

/// One entry of a select box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    /// Value stored in the field
    pub id: RecordId,
    /// Text shown to the user
    pub label: String,
}

impl FieldOption {
    /// Option for `record`, labelled by its `label` field or, failing that, its id
    pub fn from_record(record: &Record, label: &str) -> Self {
        let label = match record.get(label) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => record.id.to_string(),
            Some(other) => other.to_string(),
        };
        Self {
            id: record.id,
            label,
        }
    }
}

/// Loaded select-box options, keyed by field name
///
/// A field without an entry has no known options and accepts any id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    lists: HashMap<&'static str, Vec<FieldOption>>,
}

impl FieldOptions {
    /// No options loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the options of `field`
    pub fn set(&mut self, field: &'static str, options: Vec<FieldOption>) {
        self.lists.insert(field, options);
    }

    /// Forget the options of `field`
    pub fn remove(&mut self, field: &str) {
        self.lists.remove(field);
    }

    /// Options of `field`; empty when none were loaded
    pub fn get(&self, field: &str) -> &[FieldOption] {
        self.lists.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether options for `field` are loaded
    pub fn is_loaded(&self, field: &str) -> bool {
        self.lists.contains_key(field)
    }

    /// Label of the option `value` selects in `field`
    pub fn label(&self, field: &str, value: &Value) -> Option<&str> {
        let id = value.as_i64()?;
        self.get(field)
            .iter()
            .find(|option| option.id.get() == id)
            .map(|option| option.label.as_str())
    }

    /// Check that an id stored in `field` is one of its loaded options
    ///
    /// `null` and fields without loaded options always pass.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the unknown id.
    pub fn check(&self, field: &FieldSpec, value: &Value) -> Result<()> {
        let (Some(options), Some(id)) = (self.lists.get(field.name), value.as_i64()) else {
            return Ok(());
        };
        if options.iter().any(|option| option.id.get() == id) {
            Ok(())
        } else {
            Err(Error::validation(
                field.name,
                format!("no {} with id {id}", field.label),
            ))
        }
    }
}

/// One editable field of a resource
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Wire name
    pub name: &'static str,
    /// Column and form label
    pub label: &'static str,
    /// Input convention
    pub kind: FieldKind,
    /// Must be non-blank before submit
    pub required: bool,
    /// Add-mode default
    pub default: FieldDefault,
    /// Where the field's select options come from, if it has any
    pub options_from: Option<OptionSource>,
}

impl FieldSpec {
    /// Default value for a new draft
    pub fn default_value(&self) -> Value {
        self.default.to_value()
    }

    /// Convert raw form input into the field's JSON value
    ///
    /// # Errors
    ///
    /// Returns a validation error when the input does not fit the field kind.
    pub fn coerce(&self, raw: &str) -> Result<Value> {
        let trimmed = raw.trim();
        match self.kind {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::Number => {
                if trimmed.is_empty() {
                    return Ok(Value::Null);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| Error::validation(self.name, format!("'{raw}' is not a number")))
            }
            FieldKind::Integer => {
                if trimmed.is_empty() {
                    return Ok(Value::Null);
                }
                trimmed.parse::<i64>().map(Value::from).map_err(|_| {
                    Error::validation(self.name, format!("'{raw}' is not a whole number"))
                })
            }
            FieldKind::Boolean => parse_checkbox(trimmed)
                .map(Value::Bool)
                .ok_or_else(|| Error::validation(self.name, format!("'{raw}' is not yes or no"))),
            FieldKind::Reference => {
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                    return Ok(Value::Null);
                }
                trimmed.parse::<i64>().map(Value::from).map_err(|_| {
                    Error::validation(self.name, format!("'{raw}' is not a reference id"))
                })
            }
            FieldKind::Choice(options) => {
                if trimmed.is_empty() {
                    return Ok(Value::String(String::new()));
                }
                options
                    .iter()
                    .find(|option| option.eq_ignore_ascii_case(trimmed))
                    .map(|option| Value::String((*option).to_string()))
                    .ok_or_else(|| {
                        Error::validation(
                            self.name,
                            format!("'{raw}' is not one of {}", options.join(", ")),
                        )
                    })
            }
        }
    }

    /// Check that an already-typed value fits the field kind
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the mismatch.
    pub fn check(&self, value: &Value) -> Result<()> {
        let fits = match (self.kind, value) {
            (FieldKind::Number | FieldKind::Integer | FieldKind::Reference, Value::Null) => true,
            (FieldKind::Text, Value::String(_)) | (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Integer | FieldKind::Reference, Value::Number(n)) => n.is_i64(),
            (FieldKind::Choice(options), Value::String(s)) => {
                s.is_empty() || options.contains(&s.as_str())
            }
            _ => false,
        };

        if fits {
            Ok(())
        } else {
            Err(Error::validation(
                self.name,
                format!("value {value} does not fit a {:?} field", self.kind),
            ))
        }
    }

    /// Whether a value counts as blank for required-field checks
    pub fn is_blank(value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }
}

fn parse_checkbox(input: &str) -> Option<bool> {
    match input.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" | "checked" => Some(true),
        "false" | "no" | "n" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Shape of one master-data resource
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSchema {
    /// REST path segment, e.g. `tax-rules`
    pub path: &'static str,
    /// Singular label, e.g. `Tax Rule`
    pub singular: &'static str,
    /// Plural label, e.g. `Tax Rules`
    pub plural: &'static str,
    /// Editable fields in display order
    pub fields: &'static [FieldSpec],
}

impl ResourceSchema {
    /// Look up a field by wire name
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the schema has no such field.
    pub fn field(&self, name: &str) -> Result<&FieldSpec> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| Error::UnknownField {
                resource: self.path.to_string(),
                field: name.to_string(),
            })
    }

    /// Fresh add-mode draft filled with defaults
    pub fn default_draft(&self) -> Draft {
        Draft::from_fields(
            self.fields
                .iter()
                .map(|field| (field.name, field.default_value())),
        )
    }

    /// Edit-mode draft copied from a record, restricted to schema fields
    ///
    /// Fields the record lacks fall back to their defaults.
    pub fn draft_from(&self, record: &Record) -> Draft {
        Draft::from_fields(self.fields.iter().map(|field| {
            let value = record
                .get(field.name)
                .cloned()
                .unwrap_or_else(|| field.default_value());
            (field.name, value)
        }))
    }

    /// Fields whose options come from another resource or this one
    pub fn option_fields(&self) -> impl Iterator<Item = (&'static FieldSpec, OptionSource)> {
        self.fields
            .iter()
            .filter_map(|field| field.options_from.map(|source| (field, source)))
    }

    /// Check required fields before a draft is sent
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first blank required field.
    pub fn validate(&self, draft: &Draft) -> Result<()> {
        for field in self.fields.iter().filter(|field| field.required) {
            if FieldSpec::is_blank(draft.get(field.name)) {
                return Err(Error::validation(field.name, format!("{} is required", field.label)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    const RULE_FIELDS: &[FieldSpec] = &[
        FieldSpec {
            name: "name",
            label: "Name",
            kind: FieldKind::Text,
            required: true,
            default: FieldDefault::Text(""),
            options_from: None,
        },
        FieldSpec {
            name: "percentage",
            label: "Percentage",
            kind: FieldKind::Number,
            required: true,
            default: FieldDefault::Number(0.0),
            options_from: None,
        },
        FieldSpec {
            name: "applicable_on",
            label: "Applicable On",
            kind: FieldKind::Choice(&["MRP", "Discounted"]),
            required: false,
            default: FieldDefault::Text(""),
            options_from: None,
        },
        FieldSpec {
            name: "parent_id",
            label: "Parent",
            kind: FieldKind::Reference,
            required: false,
            default: FieldDefault::Null,
            options_from: Some(OptionSource {
                path: "rules",
                label: "name",
            }),
        },
        FieldSpec {
            name: "status",
            label: "Active",
            kind: FieldKind::Boolean,
            required: false,
            default: FieldDefault::Bool(true),
            options_from: None,
        },
    ];

    const RULES: ResourceSchema = ResourceSchema {
        path: "rules",
        singular: "Rule",
        plural: "Rules",
        fields: RULE_FIELDS,
    };

    #[test]
    fn test_default_draft_uses_field_defaults_in_order() {
        let draft = RULES.default_draft();

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"name": "", "percentage": 0.0, "applicable_on": "", "parent_id": null, "status": true})
        );
    }

    #[test]
    fn test_draft_from_record_drops_id_and_unknown_fields() {
        let record = Record::from_json(json!({
            "id": 9,
            "name": "GST",
            "percentage": 18.0,
            "created_at": "2024-01-01"
        }))
        .unwrap();

        let draft = RULES.draft_from(&record);

        assert!(draft.get("id").is_none());
        assert!(draft.get("created_at").is_none());
        assert_eq!(draft.get("name"), Some(&json!("GST")));
        assert_eq!(draft.get("status"), Some(&json!(true)));
    }

    #[rstest]
    #[case("percentage", "12.5", json!(12.5))]
    #[case("percentage", "", Value::Null)]
    #[case("applicable_on", "mrp", json!("MRP"))]
    #[case("applicable_on", "", json!(""))]
    #[case("parent_id", "", Value::Null)]
    #[case("parent_id", "4", json!(4))]
    #[case("status", "off", json!(false))]
    #[case("status", "Yes", json!(true))]
    #[case("name", "  Spaced ", json!("  Spaced "))]
    fn test_coerce_accepts(#[case] field: &str, #[case] raw: &str, #[case] expected: Value) {
        assert_eq!(RULES.field(field).unwrap().coerce(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("percentage", "lots")]
    #[case("applicable_on", "Wholesale")]
    #[case("parent_id", "root")]
    #[case("status", "maybe")]
    fn test_coerce_rejects(#[case] field: &str, #[case] raw: &str) {
        let err = RULES.field(field).unwrap().coerce(raw).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_check_typed_values() {
        assert!(RULES.field("name").unwrap().check(&json!("x")).is_ok());
        assert!(RULES.field("name").unwrap().check(&json!(1)).is_err());
        assert!(RULES.field("parent_id").unwrap().check(&Value::Null).is_ok());
        assert!(RULES.field("parent_id").unwrap().check(&json!(1.5)).is_err());
        assert!(RULES.field("status").unwrap().check(&Value::Null).is_err());
        assert!(RULES.field("applicable_on").unwrap().check(&json!("Discounted")).is_ok());
    }

    #[test]
    fn test_option_labels_and_membership() {
        let parent = RULES.field("parent_id").unwrap();
        let mut options = FieldOptions::new();

        // Nothing loaded: any id passes
        assert!(options.check(parent, &json!(99)).is_ok());
        assert!(!options.is_loaded("parent_id"));

        let records = [
            Record::from_json(json!({"id": 1, "name": "GST"})).unwrap(),
            Record::from_json(json!({"id": 2, "name": null})).unwrap(),
        ];
        options.set(
            "parent_id",
            records
                .iter()
                .map(|record| FieldOption::from_record(record, "name"))
                .collect(),
        );

        assert_eq!(options.get("parent_id").len(), 2);
        assert_eq!(options.label("parent_id", &json!(1)), Some("GST"));
        assert_eq!(options.label("parent_id", &json!(2)), Some("2"));
        assert_eq!(options.label("parent_id", &Value::Null), None);
        assert!(options.check(parent, &json!(2)).is_ok());
        assert!(options.check(parent, &Value::Null).is_ok());

        let err = options.check(parent, &json!(7)).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: parent_id - no Parent with id 7");

        options.remove("parent_id");
        assert!(options.get("parent_id").is_empty());
        assert!(options.check(parent, &json!(7)).is_ok());
    }

    #[test]
    fn test_option_fields() {
        let fields: Vec<_> = RULES
            .option_fields()
            .map(|(field, source)| (field.name, source.path))
            .collect();

        assert_eq!(fields, vec![("parent_id", "rules")]);
    }

    #[test]
    fn test_unknown_field() {
        let err = RULES.field("colour").unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_validate_requires_non_blank_fields() {
        let mut draft = RULES.default_draft();
        let err = RULES.validate(&draft).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: name - Name is required");

        draft.insert("name", json!("GST")).unwrap();
        draft.insert("percentage", Value::Null).unwrap();
        let err = RULES.validate(&draft).unwrap_err();
        assert!(err.to_string().contains("percentage"));

        draft.insert("percentage", json!(0)).unwrap();
        assert!(RULES.validate(&draft).is_ok());
    }
}
