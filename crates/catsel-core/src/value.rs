//! Cell values handed out by the store's typed accessors.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quantity::QuantityKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Numeric(f64),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> QuantityKind {
        match self {
            Value::Numeric(_) => QuantityKind::Numeric,
            Value::Text(_) => QuantityKind::String,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Numeric(_) => None,
            Value::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(v) if v.is_nan() => Ok(()),
            Value::Numeric(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Total order on numeric cells for sorting: NaN sorts after every number.
pub fn numeric_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
