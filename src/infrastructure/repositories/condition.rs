//! Translation of domain filters into SeaORM conditions

use sea_orm::{ColumnTrait, Condition, Value, sea_query::SimpleExpr};
use serde_json::Value as Json;

use crate::domain::{Comparison, DomainError, EntitySchema, PropertyKind, Where};

/// Resolve a property name to an entity column.
pub fn column<C: ColumnTrait>(schema: &EntitySchema, name: &str) -> Result<C, DomainError> {
    C::from_str(name).map_err(|_| {
        DomainError::invalid_parameter(
            "filter",
            format!("unknown property \"{}\" for {}", name, schema.name),
        )
    })
}

/// Convert a JSON value to a database value of the property's kind.
///
/// `null` becomes a typed null so it can be assigned to nullable columns.
pub fn db_value(name: &str, kind: PropertyKind, value: &Json) -> Result<Value, DomainError> {
    let converted = match (kind, value) {
        (PropertyKind::String, Json::Null) => Some(Value::String(None)),
        (PropertyKind::Integer, Json::Null) => Some(Value::Int(None)),
        (PropertyKind::Number, Json::Null) => Some(Value::Double(None)),
        (PropertyKind::Boolean, Json::Null) => Some(Value::Bool(None)),
        (PropertyKind::String, Json::String(s)) => Some(Value::from(s.clone())),
        (PropertyKind::Integer, n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::from),
        (PropertyKind::Number, n) => n.as_f64().map(Value::from),
        (PropertyKind::Boolean, b) => b.as_bool().map(Value::from),
        _ => None,
    };
    converted.ok_or_else(|| {
        DomainError::invalid_parameter(name, format!("must be {}", kind.name()))
    })
}

/// Build the condition for an optional where clause; `None` matches every row.
pub fn where_condition<C: ColumnTrait>(
    schema: &EntitySchema,
    clause: Option<&Where>,
) -> Result<Condition, DomainError> {
    match clause {
        None => Ok(Condition::all()),
        Some(clause) => build::<C>(schema, clause),
    }
}

fn build<C: ColumnTrait>(schema: &EntitySchema, clause: &Where) -> Result<Condition, DomainError> {
    match clause {
        Where::And(clauses) => clauses.iter().try_fold(Condition::all(), |acc, c| {
            Ok(acc.add(build::<C>(schema, c)?))
        }),
        Where::Or(clauses) => clauses.iter().try_fold(Condition::any(), |acc, c| {
            Ok(acc.add(build::<C>(schema, c)?))
        }),
        Where::Property { name, comparison } => {
            let column = column::<C>(schema, name)?;
            let kind = schema.kind_of(name).ok_or_else(|| {
                DomainError::invalid_parameter(
                    "filter",
                    format!("unknown property \"{}\" for {}", name, schema.name),
                )
            })?;
            let expr = comparison_expr(column, name, kind, comparison)?;
            Ok(Condition::all().add(expr))
        }
    }
}

fn comparison_expr<C: ColumnTrait>(
    column: C,
    name: &str,
    kind: PropertyKind,
    comparison: &Comparison,
) -> Result<SimpleExpr, DomainError> {
    let value = |v: &Json| db_value(name, kind, v);
    let values = |vs: &[Json]| vs.iter().map(value).collect::<Result<Vec<_>, _>>();

    Ok(match comparison {
        Comparison::Eq(Json::Null) => column.is_null(),
        Comparison::Eq(v) => column.eq(value(v)?),
        Comparison::Neq(Json::Null) => column.is_not_null(),
        Comparison::Neq(v) => column.ne(value(v)?),
        Comparison::Gt(v) => column.gt(value(v)?),
        Comparison::Gte(v) => column.gte(value(v)?),
        Comparison::Lt(v) => column.lt(value(v)?),
        Comparison::Lte(v) => column.lte(value(v)?),
        Comparison::Inq(vs) => column.is_in(values(vs)?),
        Comparison::Nin(vs) => column.is_not_in(values(vs)?),
        Comparison::Between(low, high) => column.between(value(low)?, value(high)?),
        Comparison::Like(pattern) => column.like(pattern.as_str()),
        Comparison::NotLike(pattern) => column.not_like(pattern.as_str()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_nulls_match_the_property_kind() {
        assert_eq!(
            db_value("x", PropertyKind::String, &Json::Null).unwrap(),
            Value::String(None)
        );
        assert_eq!(
            db_value("x", PropertyKind::Integer, &Json::Null).unwrap(),
            Value::Int(None)
        );
    }

    #[test]
    fn integers_must_fit_in_i32() {
        assert_eq!(
            db_value("rating", PropertyKind::Integer, &json!(4)).unwrap(),
            Value::Int(Some(4))
        );
        assert!(db_value("rating", PropertyKind::Integer, &json!(1u64 << 40)).is_err());
        assert!(db_value("rating", PropertyKind::Integer, &json!("4")).is_err());
    }
}
