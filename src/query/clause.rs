//! Clauses - The conditions a query accumulates.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

/// Comparison operator for field clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// SQL-style pattern match: `%` matches any run of characters, `_` exactly one.
    Like,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Like => "like",
        };
        f.write_str(symbol)
    }
}

/// Sort direction for `order_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

pub(crate) type Predicate<M> = Arc<dyn Fn(&M) -> bool + Send + Sync>;

pub(crate) enum Clause<M> {
    Compare { field: String, op: Op, value: Value },
    In { field: String, values: Vec<Value>, negated: bool },
    Null { field: String, negated: bool },
    Predicate(Predicate<M>),
}

impl<M> Clone for Clause<M> {
    fn clone(&self) -> Self {
        match self {
            Clause::Compare { field, op, value } => Clause::Compare {
                field: field.clone(),
                op: *op,
                value: value.clone(),
            },
            Clause::In {
                field,
                values,
                negated,
            } => Clause::In {
                field: field.clone(),
                values: values.clone(),
                negated: *negated,
            },
            Clause::Null { field, negated } => Clause::Null {
                field: field.clone(),
                negated: *negated,
            },
            Clause::Predicate(predicate) => Clause::Predicate(Arc::clone(predicate)),
        }
    }
}

impl<M> fmt::Debug for Clause<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Compare { field, op, value } => write!(f, "{} {} {}", field, op, value),
            Clause::In {
                field,
                values,
                negated,
            } => {
                let keyword = if *negated { "not in" } else { "in" };
                write!(f, "{} {} {:?}", field, keyword, values)
            }
            Clause::Null { field, negated } => {
                let keyword = if *negated { "is not null" } else { "is null" };
                write!(f, "{} {}", field, keyword)
            }
            Clause::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

impl<M> Clause<M> {
    /// Evaluate closure predicates against the typed model.
    pub(crate) fn accepts_model(&self, model: &M) -> bool {
        match self {
            Clause::Predicate(predicate) => predicate(model),
            _ => true,
        }
    }

    /// Evaluate field clauses against the model's JSON form.
    pub(crate) fn accepts_row(&self, row: &Value) -> bool {
        match self {
            Clause::Compare { field, op, value } => {
                let actual = lookup(row, field).unwrap_or(&Value::Null);
                compare(actual, *op, value)
            }
            Clause::In {
                field,
                values,
                negated,
            } => {
                let actual = lookup(row, field).unwrap_or(&Value::Null);
                values.iter().any(|v| values_equal(actual, v)) != *negated
            }
            Clause::Null { field, negated } => {
                let is_null = lookup(row, field).map(Value::is_null).unwrap_or(true);
                is_null != *negated
            }
            Clause::Predicate(_) => true,
        }
    }
}

/// Resolve a dotted path (`address.city`, `tags.0`) inside a JSON value.
pub(crate) fn lookup<'a>(row: &'a Value, field: &str) -> Option<&'a Value> {
    field.split('.').try_fold(row, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_order(x, y) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Integers compare exactly; only floats go through `f64`.
fn number_order(x: &Number, y: &Number) -> Option<Ordering> {
    match (x.as_i64(), y.as_i64(), x.as_u64(), y.as_u64()) {
        (Some(a), Some(b), _, _) => Some(a.cmp(&b)),
        (_, _, Some(a), Some(b)) => Some(a.cmp(&b)),
        // y is above i64::MAX
        (Some(_), None, _, Some(_)) => Some(Ordering::Less),
        (None, Some(_), Some(_), _) => Some(Ordering::Greater),
        _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
    }
}

/// Ordering between values of the same kind; `None` across kinds.
fn partial_order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_order(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare(actual: &Value, op: Op, expected: &Value) -> bool {
    match op {
        Op::Eq => values_equal(actual, expected),
        Op::Ne => !values_equal(actual, expected),
        Op::Gt => partial_order(actual, expected) == Some(Ordering::Greater),
        Op::Gte => matches!(
            partial_order(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Op::Lt => partial_order(actual, expected) == Some(Ordering::Less),
        Op::Lte => matches!(
            partial_order(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Op::Like => match (actual, expected) {
            (Value::String(text), Value::String(pattern)) => like(text, pattern),
            _ => false,
        },
    }
}

fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // matches[j]: pattern[..i] matches text[..j]
    let mut matches = vec![false; text.len() + 1];
    matches[0] = true;

    for p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '%' => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= matches[j];
                    next[j] = seen;
                }
            }
            '_' => {
                for j in 1..=text.len() {
                    next[j] = matches[j - 1];
                }
            }
            c => {
                for j in 1..=text.len() {
                    next[j] = matches[j - 1] && text[j - 1] == *c;
                }
            }
        }
        matches = next;
    }

    matches[text.len()]
}

/// Total order used for sorting: null < bool < number < string < others.
pub(crate) fn sort_order(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => partial_order(a, b).unwrap_or_else(|| rank(a).cmp(&rank(b))),
    }
}
