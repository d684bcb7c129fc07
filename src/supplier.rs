// src/supplier.rs

use std::{collections::HashMap, fmt};
use serde::{Deserialize, Serialize};

/// One entry of the `/suppliers/{framework}` response.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Supplier {
    pub name: String,
    /// CSS class token for the supplier's category.
    pub color: String,
    #[serde(default)]
    pub details: HashMap<String, DetailValue>,
}

/// A detail value as the endpoint sends it: text, a number, or null.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DetailValue {
    Number(f64),
    Text(String),
    Null,
}

impl DetailValue {
    /// Numeric reading of the value; text is parsed leniently.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DetailValue::Number(n) => Some(*n),
            DetailValue::Text(s) => s.trim().parse().ok(),
            DetailValue::Null => None,
        }
    }
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::Number(n) => write!(f, "{}", n),
            DetailValue::Text(s) => f.write_str(s),
            DetailValue::Null => Ok(()),
        }
    }
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        DetailValue::Text(value.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        DetailValue::Text(value)
    }
}

impl From<f64> for DetailValue {
    fn from(value: f64) -> Self {
        DetailValue::Number(value)
    }
}
