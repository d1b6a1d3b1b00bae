//! Runtime Value Representation
//!
//! Defines the values carried on the BankVM stack and in variables.

use std::fmt;

use serde::Serialize;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric value (IEEE 754)
    Number(f64),

    /// Text value
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Print formatting: integral numbers without a decimal point, other
/// numbers with two decimals, text verbatim.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => fmt_number(*n, f),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n == 0.0 {
        // also covers -0.0
        f.write_str("0")
    } else if n.is_finite() && n.fract() == 0.0 {
        write!(f, "{:.0}", n)
    } else {
        write!(f, "{:.2}", n)
    }
}
