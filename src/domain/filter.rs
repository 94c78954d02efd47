//! Query filters accepted on list, count and bulk-update endpoints
//!
//! A filter is a JSON object such as
//! `{"where": {"rating": {"gte": 4}}, "order": "rating DESC", "limit": 10}`.
//! Parsing validates property names and value kinds against the entity
//! schema, so repositories only ever see well-formed filters.

use serde_json::{Map, Value};

use super::DomainError;
use super::schema::{EntitySchema, PropertyKind};

/// A single comparison against one property
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// `null` means IS NULL
    Eq(Value),
    /// `null` means IS NOT NULL
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Inq(Vec<Value>),
    Nin(Vec<Value>),
    Between(Value, Value),
    Like(String),
    NotLike(String),
}

/// Boolean tree of comparisons
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    And(Vec<Where>),
    Or(Vec<Where>),
    Property {
        name: String,
        comparison: Comparison,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

/// Projection of returned properties
#[derive(Debug, Clone, PartialEq)]
pub enum Fields {
    /// Only these properties
    Include(Vec<String>),
    /// Every property but these
    Exclude(Vec<String>),
}

/// Which parts of a filter an endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    Full,
    /// Lookup by id: `where` is not allowed
    ExcludingWhere,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub r#where: Option<Where>,
    pub order: Vec<Order>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub fields: Option<Fields>,
}

const FILTER_PARAM: &str = "filter";
const WHERE_PARAM: &str = "where";

impl Filter {
    /// Parse the raw `filter` query parameter; absent means "no filter".
    pub fn from_query(
        raw: Option<&str>,
        schema: &EntitySchema,
        scope: FilterScope,
    ) -> Result<Self, DomainError> {
        match raw {
            None => Ok(Filter::default()),
            Some(raw) => {
                let value = parse_json(FILTER_PARAM, raw)?;
                Filter::parse(&value, schema, scope)
            }
        }
    }

    pub fn parse(
        value: &Value,
        schema: &EntitySchema,
        scope: FilterScope,
    ) -> Result<Self, DomainError> {
        let object = value
            .as_object()
            .ok_or_else(|| DomainError::invalid_parameter(FILTER_PARAM, "must be an object"))?;

        let mut filter = Filter::default();
        for (key, value) in object {
            match key.as_str() {
                "where" if scope == FilterScope::ExcludingWhere => {
                    return Err(DomainError::invalid_parameter(
                        FILTER_PARAM,
                        "\"where\" is not allowed when looking up by id",
                    ));
                }
                "where" => filter.r#where = parse_where_root(value, schema, FILTER_PARAM)?,
                "order" => filter.order = parse_order(value, schema)?,
                "limit" => filter.limit = parse_count(value, "limit")?,
                "skip" | "offset" => filter.skip = parse_count(value, key)?,
                "fields" => filter.fields = parse_fields(value, schema)?,
                "include" => check_include(value, schema)?,
                other => {
                    return Err(DomainError::invalid_parameter(
                        FILTER_PARAM,
                        format!("unknown filter key \"{}\"", other),
                    ));
                }
            }
        }
        Ok(filter)
    }
}

impl Where {
    /// Parse the raw `where` query parameter of count and bulk update.
    pub fn from_query(raw: Option<&str>, schema: &EntitySchema) -> Result<Option<Self>, DomainError> {
        match raw {
            None => Ok(None),
            Some(raw) => {
                let value = parse_json(WHERE_PARAM, raw)?;
                parse_where_root(&value, schema, WHERE_PARAM)
            }
        }
    }
}

impl Fields {
    /// Keep only the selected properties of a serialized entity.
    pub fn project(&self, value: Value) -> Value {
        let Value::Object(object) = value else {
            return value;
        };
        let projected: Map<String, Value> = object
            .into_iter()
            .filter(|(key, _)| match self {
                Fields::Include(names) => names.iter().any(|n| n == key),
                Fields::Exclude(names) => !names.iter().any(|n| n == key),
            })
            .collect();
        Value::Object(projected)
    }
}

fn parse_json(param: &str, raw: &str) -> Result<Value, DomainError> {
    serde_json::from_str(raw).map_err(|e| DomainError::invalid_parameter(param, e))
}

fn parse_where_root(
    value: &Value,
    schema: &EntitySchema,
    param: &str,
) -> Result<Option<Where>, DomainError> {
    if value.is_null() {
        return Ok(None);
    }
    let clause = parse_where(value, schema, param)?;
    Ok(match clause {
        Where::And(clauses) if clauses.is_empty() => None,
        clause => Some(clause),
    })
}

fn parse_where(value: &Value, schema: &EntitySchema, param: &str) -> Result<Where, DomainError> {
    let object = value
        .as_object()
        .ok_or_else(|| DomainError::invalid_parameter(param, "where clause must be an object"))?;

    let mut clauses = Vec::new();
    for (key, value) in object {
        match key.as_str() {
            "and" | "or" => {
                let branches = value
                    .as_array()
                    .ok_or_else(|| {
                        DomainError::invalid_parameter(param, format!("\"{}\" must be an array", key))
                    })?
                    .iter()
                    .map(|branch| parse_where(branch, schema, param))
                    .collect::<Result<Vec<_>, _>>()?;
                clauses.push(if key == "and" {
                    Where::And(branches)
                } else {
                    Where::Or(branches)
                });
            }
            name => {
                let kind = schema.kind_of(name).ok_or_else(|| {
                    DomainError::invalid_parameter(
                        param,
                        format!("unknown property \"{}\" for {}", name, schema.name),
                    )
                })?;
                for comparison in parse_comparisons(name, kind, value, param)? {
                    clauses.push(Where::Property {
                        name: name.to_string(),
                        comparison,
                    });
                }
            }
        }
    }

    Ok(if clauses.len() == 1 {
        clauses.remove(0)
    } else {
        Where::And(clauses)
    })
}

fn parse_comparisons(
    name: &str,
    kind: PropertyKind,
    value: &Value,
    param: &str,
) -> Result<Vec<Comparison>, DomainError> {
    let Value::Object(operators) = value else {
        return Ok(vec![Comparison::Eq(scalar(name, kind, value, true, param)?)]);
    };

    let mut comparisons = Vec::with_capacity(operators.len());
    for (op, operand) in operators {
        let comparison = match op.as_str() {
            "eq" => Comparison::Eq(scalar(name, kind, operand, true, param)?),
            "neq" => Comparison::Neq(scalar(name, kind, operand, true, param)?),
            "gt" => Comparison::Gt(scalar(name, kind, operand, false, param)?),
            "gte" => Comparison::Gte(scalar(name, kind, operand, false, param)?),
            "lt" => Comparison::Lt(scalar(name, kind, operand, false, param)?),
            "lte" => Comparison::Lte(scalar(name, kind, operand, false, param)?),
            "inq" => Comparison::Inq(list(name, kind, operand, param)?),
            "nin" => Comparison::Nin(list(name, kind, operand, param)?),
            "between" => {
                let bounds = list(name, kind, operand, param)?;
                let [low, high]: [Value; 2] = bounds.try_into().map_err(|_| {
                    DomainError::invalid_parameter(
                        param,
                        format!("\"between\" on \"{}\" needs exactly two values", name),
                    )
                })?;
                Comparison::Between(low, high)
            }
            "like" => Comparison::Like(pattern(name, operand, param)?),
            "nlike" => Comparison::NotLike(pattern(name, operand, param)?),
            other => {
                return Err(DomainError::invalid_parameter(
                    param,
                    format!("unsupported operator \"{}\" on \"{}\"", other, name),
                ));
            }
        };
        comparisons.push(comparison);
    }
    if comparisons.is_empty() {
        return Err(DomainError::invalid_parameter(
            param,
            format!("empty condition on \"{}\"", name),
        ));
    }
    Ok(comparisons)
}

fn scalar(
    name: &str,
    kind: PropertyKind,
    value: &Value,
    allow_null: bool,
    param: &str,
) -> Result<Value, DomainError> {
    if (value.is_null() && allow_null) || kind.accepts(value) {
        Ok(value.clone())
    } else {
        Err(DomainError::invalid_parameter(
            param,
            format!("value for \"{}\" must be {}", name, kind.name()),
        ))
    }
}

fn list(name: &str, kind: PropertyKind, value: &Value, param: &str) -> Result<Vec<Value>, DomainError> {
    value
        .as_array()
        .ok_or_else(|| {
            DomainError::invalid_parameter(param, format!("operand on \"{}\" must be an array", name))
        })?
        .iter()
        .map(|item| scalar(name, kind, item, false, param))
        .collect()
}

fn pattern(name: &str, value: &Value, param: &str) -> Result<String, DomainError> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        DomainError::invalid_parameter(param, format!("pattern on \"{}\" must be a string", name))
    })
}

fn parse_order(value: &Value, schema: &EntitySchema) -> Result<Vec<Order>, DomainError> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    items
        .into_iter()
        .map(|item| {
            let spec = item.as_str().ok_or_else(|| {
                DomainError::invalid_parameter(FILTER_PARAM, "order entries must be strings")
            })?;
            let mut parts = spec.split_whitespace();
            let property = parts.next().unwrap_or_default();
            if schema.kind_of(property).is_none() {
                return Err(DomainError::invalid_parameter(
                    FILTER_PARAM,
                    format!("cannot order by unknown property \"{}\"", property),
                ));
            }
            let direction = match parts.next().map(str::to_ascii_uppercase).as_deref() {
                None | Some("ASC") => Direction::Asc,
                Some("DESC") => Direction::Desc,
                Some(other) => {
                    return Err(DomainError::invalid_parameter(
                        FILTER_PARAM,
                        format!("invalid order direction \"{}\"", other),
                    ));
                }
            };
            if parts.next().is_some() {
                return Err(DomainError::invalid_parameter(
                    FILTER_PARAM,
                    format!("invalid order \"{}\"", spec),
                ));
            }
            Ok(Order {
                property: property.to_string(),
                direction,
            })
        })
        .collect()
}

fn parse_count(value: &Value, key: &str) -> Result<Option<u64>, DomainError> {
    if value.is_null() {
        return Ok(None);
    }
    value.as_u64().map(Some).ok_or_else(|| {
        DomainError::invalid_parameter(
            FILTER_PARAM,
            format!("\"{}\" must be a non-negative integer", key),
        )
    })
}

fn parse_fields(value: &Value, schema: &EntitySchema) -> Result<Option<Fields>, DomainError> {
    let known = |name: &str| -> Result<String, DomainError> {
        if schema.kind_of(name).is_some() {
            Ok(name.to_string())
        } else {
            Err(DomainError::invalid_parameter(
                FILTER_PARAM,
                format!("unknown field \"{}\"", name),
            ))
        }
    };

    match value {
        Value::Null => Ok(None),
        Value::Array(names) => {
            let names = names
                .iter()
                .map(|n| {
                    n.as_str().ok_or_else(|| {
                        DomainError::invalid_parameter(FILTER_PARAM, "field names must be strings")
                    })
                    .and_then(|n| known(n))
                })
                .collect::<Result<Vec<_>, _>>()?;
            // Empty list means all properties
            Ok((!names.is_empty()).then_some(Fields::Include(names)))
        }
        Value::Object(flags) => {
            let mut included = Vec::new();
            let mut excluded = Vec::new();
            for (name, flag) in flags {
                let name = known(name.as_str())?;
                match flag.as_bool() {
                    Some(true) => included.push(name),
                    Some(false) => excluded.push(name),
                    None => {
                        return Err(DomainError::invalid_parameter(
                            FILTER_PARAM,
                            format!("field flag for \"{}\" must be a boolean", name),
                        ));
                    }
                }
            }
            Ok(Some(if included.is_empty() {
                Fields::Exclude(excluded)
            } else {
                Fields::Include(included)
            }))
        }
        _ => Err(DomainError::invalid_parameter(
            FILTER_PARAM,
            "fields must be an array or an object",
        )),
    }
}

/// No relations are declared on any entity, so any inclusion is an error.
fn check_include(value: &Value, schema: &EntitySchema) -> Result<(), DomainError> {
    let first = match value {
        Value::Null => None,
        Value::Array(items) => items.first().cloned(),
        other => Some(other.clone()),
    };
    match first {
        None => Ok(()),
        Some(relation) => {
            let relation = match &relation {
                Value::String(name) => name.clone(),
                Value::Object(spec) => spec
                    .get("relation")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                other => other.to_string(),
            };
            Err(DomainError::invalid_parameter(
                FILTER_PARAM,
                format!("Relation \"{}\" is not defined for {} model", relation, schema.name),
            ))
        }
    }
}
