//! Runtime value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Val {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Val {
    /// Class name as the script sees it
    pub fn class_name(&self) -> &'static str {
        match self {
            Val::Nil => "NilClass",
            Val::Bool(true) => "TrueClass",
            Val::Bool(false) => "FalseClass",
            Val::Int(_) => "Integer",
            Val::Float(_) => "Float",
            Val::Str(_) => "String",
        }
    }

    /// How the value reads in a `NoMethodError` message
    pub fn describe(&self) -> String {
        match self {
            Val::Nil => "nil".to_string(),
            Val::Bool(b) => b.to_string(),
            other => format!("an instance of {}", other.class_name()),
        }
    }

    /// Whether the value lives in the allocation arena
    pub fn is_heap(&self) -> bool {
        matches!(self, Val::Str(_))
    }
}

/// `to_s` rendering, which is what `puts` prints
impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Nil => Ok(()),
            Val::Bool(b) => write!(f, "{}", b),
            Val::Int(i) => write!(f, "{}", i),
            Val::Float(x) if x.is_nan() => write!(f, "NaN"),
            Val::Float(x) if x.is_infinite() => {
                write!(f, "{}", if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Val::Float(x) if x.fract() == 0.0 => write!(f, "{:.1}", x),
            Val::Float(x) => write!(f, "{}", x),
            Val::Str(s) => write!(f, "{}", s),
        }
    }
}
