//! Filter expressions
//!
//! A filter arrives as an object value and is parsed once into a [`Filter`]
//! tree, which is then evaluated against every document of a collection.
//!
//! ## Grammar
//!
//! Every top-level key is ANDed:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `$and: [f, ...]` | every sub-filter matches |
//! | `$or: [f, ...]` | at least one sub-filter matches (`[]` matches nothing) |
//! | `$not: f` | the sub-filter does not match |
//! | `a.b.c: x` | descend into object field `a`, match `b.c: x` there |
//! | `field: {$op: x, ...}` | every recognized operator passes |
//! | `field: x` | field present and equal to `x` |
//!
//! Unknown `$` operators are ignored. A `$regex` pattern must match the
//! whole string.

use mpdb_core::{Map, Value};
use regex::Regex;
use tracing::debug;

use super::compare::{compare_values, values_equal};
use std::cmp::Ordering;

/// Parsed filter tree
#[derive(Debug, Clone)]
pub enum Filter {
    /// Every child matches (top-level keys and `$and`)
    And(Vec<Filter>),
    /// At least one child matches
    Or(Vec<Filter>),
    /// Child does not match
    Not(Box<Filter>),
    /// Descend into an object-valued field
    Nested {
        /// Field holding the sub-object
        field: String,
        /// Filter applied to the sub-object
        rest: Box<Filter>,
    },
    /// Literal equality on a field
    Eq {
        /// Field name
        field: String,
        /// Expected value
        value: Value,
    },
    /// Operator object on a field
    Ops {
        /// Field name
        field: String,
        /// Recognized operators, implicitly ANDed
        ops: Vec<Operator>,
    },
}

/// A single comparison inside an operator object
#[derive(Debug, Clone)]
pub enum Operator {
    /// `$eq`
    Eq(Value),
    /// `$ne`
    Ne(Value),
    /// `$gt`
    Gt(Value),
    /// `$gte`
    Gte(Value),
    /// `$lt`
    Lt(Value),
    /// `$lte`
    Lte(Value),
    /// `$in`
    In(Vec<Value>),
    /// `$nin`
    Nin(Vec<Value>),
    /// `$in` or `$nin` whose argument is not an array; never passes
    NotASet,
    /// `$exists`
    Exists(bool),
    /// `$regex`, anchored; `None` when the pattern does not compile
    Regex(Option<Regex>),
}

impl Filter {
    /// Parse a filter object
    pub fn parse(query: &Map) -> Filter {
        Filter::And(
            query
                .iter()
                .filter_map(|(key, value)| parse_clause(key, value))
                .collect(),
        )
    }

    /// A filter that matches every document
    pub fn match_all() -> Filter {
        Filter::And(Vec::new())
    }

    /// Evaluate against a document body (or a nested sub-object)
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::And(children) => children.iter().all(|f| f.matches(doc)),
            Filter::Or(children) => children.iter().any(|f| f.matches(doc)),
            Filter::Not(child) => !child.matches(doc),
            Filter::Nested { field, rest } => match doc.get(field) {
                Some(sub @ Value::Object(_)) => rest.matches(sub),
                _ => false,
            },
            Filter::Eq { field, value } => doc
                .get(field)
                .map(|actual| values_equal(actual, value))
                .unwrap_or(false),
            Filter::Ops { field, ops } => match doc.get(field) {
                Some(actual) => ops.iter().all(|op| op.matches(Some(actual))),
                // Only `$exists` can say something useful about a missing field
                None => {
                    ops.iter().any(Operator::is_exists) && ops.iter().all(|op| op.matches(None))
                }
            },
        }
    }
}

impl Operator {
    /// Parse one `$op: argument` pair. Unknown operators yield `None`.
    pub fn parse(op: &str, arg: &Value) -> Option<Operator> {
        let parsed = match op {
            "$eq" => Operator::Eq(arg.clone()),
            "$ne" => Operator::Ne(arg.clone()),
            "$gt" => Operator::Gt(arg.clone()),
            "$gte" => Operator::Gte(arg.clone()),
            "$lt" => Operator::Lt(arg.clone()),
            "$lte" => Operator::Lte(arg.clone()),
            "$in" => arg
                .as_array()
                .map(|set| Operator::In(set.to_vec()))
                .unwrap_or(Operator::NotASet),
            "$nin" => arg
                .as_array()
                .map(|set| Operator::Nin(set.to_vec()))
                .unwrap_or(Operator::NotASet),
            "$exists" => Operator::Exists(is_truthy(arg)),
            "$regex" => Operator::Regex(compile_full_match(&arg.canonical_string())),
            other => {
                debug!(operator = other, "Ignoring unknown query operator");
                return None;
            }
        };
        Some(parsed)
    }

    fn is_exists(&self) -> bool {
        matches!(self, Operator::Exists(_))
    }

    /// Evaluate against a field value; `None` means the field is absent
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        let actual = match (self, actual) {
            (Operator::Exists(wanted), present) => return present.is_some() == *wanted,
            (_, None) => return false,
            (_, Some(v)) => v,
        };
        match self {
            Operator::Eq(expected) => values_equal(actual, expected),
            Operator::Ne(expected) => !values_equal(actual, expected),
            Operator::Gt(bound) => compare_values(actual, bound) == Ordering::Greater,
            Operator::Gte(bound) => {
                compare_values(actual, bound) == Ordering::Greater || values_equal(actual, bound)
            }
            Operator::Lt(bound) => compare_values(actual, bound) == Ordering::Less,
            Operator::Lte(bound) => {
                compare_values(actual, bound) == Ordering::Less || values_equal(actual, bound)
            }
            Operator::In(set) => set.iter().any(|c| values_equal(c, actual)),
            Operator::Nin(set) => !set.iter().any(|c| values_equal(c, actual)),
            Operator::NotASet => false,
            Operator::Regex(Some(re)) => actual.as_str().map(|s| re.is_match(s)).unwrap_or(false),
            Operator::Regex(None) => false,
            Operator::Exists(wanted) => *wanted,
        }
    }
}

fn parse_clause(key: &str, value: &Value) -> Option<Filter> {
    match key {
        "$and" => value.as_array().map(|items| Filter::And(sub_filters(items))),
        "$or" => value.as_array().map(|items| Filter::Or(sub_filters(items))),
        "$not" => value
            .as_object()
            .map(|sub| Filter::Not(Box::new(Filter::parse(sub)))),
        _ => Some(parse_field(key, value)),
    }
}

/// Non-object entries of `$and`/`$or` are skipped.
fn sub_filters(items: &[Value]) -> Vec<Filter> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(Filter::parse)
        .collect()
}

fn parse_field(key: &str, value: &Value) -> Filter {
    if let Some((head, rest)) = key.split_once('.') {
        let mut sub = Map::new();
        sub.insert(rest.to_string(), value.clone());
        return Filter::Nested {
            field: head.to_string(),
            rest: Box::new(Filter::parse(&sub)),
        };
    }

    match value {
        Value::Object(ops) if ops.keys().any(|k| k.starts_with('$')) => Filter::Ops {
            field: key.to_string(),
            ops: ops
                .iter()
                .filter_map(|(op, arg)| Operator::parse(op, arg))
                .collect(),
        },
        _ => Filter::Eq {
            field: key.to_string(),
            value: value.clone(),
        },
    }
}

fn is_truthy(arg: &Value) -> bool {
    match arg {
        Value::Bool(b) => *b,
        other => other.canonical_string().eq_ignore_ascii_case("true"),
    }
}

fn compile_full_match(pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(pattern, error = %e, "Invalid $regex pattern, condition will not match");
            None
        }
    }
}
