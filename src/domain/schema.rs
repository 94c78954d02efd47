//! Declarative entity schemas and request-body validation
//!
//! Every entity publishes a static [`EntitySchema`]. Handlers validate the
//! incoming JSON against it before calling a repository, and repositories use
//! it to map property names and values onto columns.

use serde_json::{Map, Value};

use super::{DomainError, ValidationIssue};

/// JSON kind accepted for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    /// 32-bit signed integer
    Integer,
    Number,
    Boolean,
}

impl PropertyKind {
    pub fn name(self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::Number => "number",
            PropertyKind::Boolean => "boolean",
        }
    }

    /// Whether a non-null JSON value has this kind
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            PropertyKind::String => value.is_string(),
            PropertyKind::Integer => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            PropertyKind::Number => value.is_number(),
            PropertyKind::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Property {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub required: bool,
}

impl Property {
    pub const fn required(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Shape of one entity: its name, id property and writable properties
#[derive(Debug)]
pub struct EntitySchema {
    pub name: &'static str,
    /// Generated string primary key
    pub id: &'static str,
    pub properties: &'static [Property],
}

/// What kind of write a body is validated for
#[derive(Debug, Clone, Copy)]
pub enum BodyMode<'a> {
    /// New record; id is generated and must not be sent
    Create,
    /// Merge into existing record(s); every property optional
    Partial,
    /// Full replacement of the record with the given id
    Replace(&'a str),
}

/// A body that passed validation: known properties with values of the right kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl EntitySchema {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Kind of a property, counting the id as a string
    pub fn kind_of(&self, name: &str) -> Option<PropertyKind> {
        if name == self.id {
            return Some(PropertyKind::String);
        }
        self.property(name).map(|p| p.kind)
    }

    /// All property names including the id, in declaration order
    pub fn property_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.id).chain(self.properties.iter().map(|p| p.name))
    }

    /// Validate a request body, collecting every issue before failing.
    pub fn validate(&self, body: &Value, mode: BodyMode<'_>) -> Result<Record, DomainError> {
        let Some(object) = body.as_object() else {
            return Err(DomainError::Validation(vec![ValidationIssue::new(
                "",
                "type",
                "must be object",
            )]));
        };

        let mut issues = Vec::new();
        let mut record = Map::new();

        for (key, value) in object {
            if key == self.id {
                match mode {
                    BodyMode::Replace(id) if value.as_str() == Some(id) => {}
                    BodyMode::Replace(_) => issues.push(ValidationIssue::new(
                        format!("/{}", key),
                        "const",
                        format!("must be equal to the {} in the path", self.id),
                    )),
                    _ => issues.push(ValidationIssue::new(
                        "",
                        "additionalProperties",
                        format!("must NOT have additional property '{}'", key),
                    )),
                }
                continue;
            }

            let Some(property) = self.property(key) else {
                issues.push(ValidationIssue::new(
                    "",
                    "additionalProperties",
                    format!("must NOT have additional property '{}'", key),
                ));
                continue;
            };

            let valid = if value.is_null() {
                !property.required
            } else {
                property.kind.accepts(value)
            };
            if valid {
                record.insert(key.clone(), value.clone());
            } else {
                issues.push(ValidationIssue::new(
                    format!("/{}", key),
                    "type",
                    format!("must be {}", property.kind.name()),
                ));
            }
        }

        if !matches!(mode, BodyMode::Partial) {
            for property in self.properties.iter().filter(|p| p.required) {
                if !object.contains_key(property.name) {
                    issues.push(ValidationIssue::new(
                        "",
                        "required",
                        format!("must have required property '{}'", property.name),
                    ));
                }
            }
        }

        if !issues.is_empty() {
            return Err(DomainError::Validation(issues));
        }

        if let BodyMode::Replace(_) = mode {
            for property in self.properties {
                record
                    .entry(property.name.to_string())
                    .or_insert(Value::Null);
            }
        }

        Ok(Record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static NOTE: EntitySchema = EntitySchema {
        name: "Note",
        id: "id",
        properties: &[
            Property::required("text", PropertyKind::String),
            Property::optional("stars", PropertyKind::Integer),
            Property::optional("pinned", PropertyKind::Boolean),
        ],
    };

    fn issues(err: DomainError) -> Vec<ValidationIssue> {
        match err {
            DomainError::Validation(issues) => issues,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_accepts_valid_body() {
        let record = NOTE
            .validate(&json!({"text": "hi", "stars": 3}), BodyMode::Create)
            .unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("stars"), Some(&json!(3)));
    }

    #[test]
    fn create_rejects_id_and_reports_missing_required() {
        let errs = issues(
            NOTE.validate(&json!({"id": "x", "stars": 1}), BodyMode::Create)
                .unwrap_err(),
        );
        let codes: Vec<_> = errs.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec!["additionalProperties", "required"]);
    }

    #[test]
    fn wrong_kinds_and_unknown_properties_are_collected() {
        let errs = issues(
            NOTE.validate(
                &json!({"text": 5, "stars": 1.5, "color": "red"}),
                BodyMode::Create,
            )
            .unwrap_err(),
        );
        assert_eq!(errs.len(), 3);
        assert!(errs.iter().any(|i| i.path == "/text" && i.message == "must be string"));
        assert!(errs.iter().any(|i| i.path == "/stars" && i.message == "must be integer"));
        assert!(errs.iter().any(|i| i.message.contains("'color'")));
    }

    #[test]
    fn integer_out_of_i32_range_is_rejected() {
        let result = NOTE.validate(&json!({"text": "a", "stars": 5_000_000_000i64}), BodyMode::Create);
        assert!(result.is_err());
    }

    #[test]
    fn partial_skips_required_check() {
        let record = NOTE
            .validate(&json!({"pinned": true}), BodyMode::Partial)
            .unwrap();
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn null_only_allowed_for_optional_properties() {
        assert!(NOTE.validate(&json!({"stars": null}), BodyMode::Partial).is_ok());
        assert!(NOTE.validate(&json!({"text": null}), BodyMode::Partial).is_err());
    }

    #[test]
    fn replace_fills_missing_optionals_with_null() {
        let record = NOTE
            .validate(&json!({"text": "x"}), BodyMode::Replace("n1"))
            .unwrap();
        assert_eq!(record.get("stars"), Some(&Value::Null));
        assert_eq!(record.get("pinned"), Some(&Value::Null));
    }

    #[test]
    fn replace_checks_body_id_against_path() {
        assert!(
            NOTE.validate(&json!({"id": "n1", "text": "x"}), BodyMode::Replace("n1"))
                .is_ok()
        );
        let errs = issues(
            NOTE.validate(&json!({"id": "n2", "text": "x"}), BodyMode::Replace("n1"))
                .unwrap_err(),
        );
        assert_eq!(errs[0].code, "const");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errs = issues(NOTE.validate(&json!([1, 2]), BodyMode::Create).unwrap_err());
        assert_eq!(errs[0].message, "must be object");
    }
}
