// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Argument values and their OpenSCAD spelling

use crate::utils::round_to;
use nalgebra::{Point2, Point3, Vector3};

/// A single argument value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Int(i64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Format the value; floats are rounded to `precision` decimals.
    pub fn to_scad(&self, precision: u32) -> String {
        match self {
            Value::Float(v) => format!("{}", round_to(*v, precision)),
            Value::Int(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Str(s) => format!("\"{}\"", escape(s)),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(|item| item.to_scad(precision)).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(values: [f64; N]) -> Self {
        Value::List(values.iter().map(|&v| Value::Float(v)).collect())
    }
}

impl From<Vector3<f64>> for Value {
    fn from(v: Vector3<f64>) -> Self {
        Value::from([v.x, v.y, v.z])
    }
}

impl From<&Point2<f64>> for Value {
    fn from(p: &Point2<f64>) -> Self {
        Value::from([p.x, p.y])
    }
}

impl From<&Point3<f64>> for Value {
    fn from(p: &Point3<f64>) -> Self {
        Value::from([p.x, p.y, p.z])
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered argument list of a call; a `None` key is a positional argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(Option<&'static str>, Value)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.entries.push((Some(key), value.into()));
        self
    }

    /// Add the argument only when a value is present
    pub fn with_opt<V: Into<Value>>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn positional(mut self, value: impl Into<Value>) -> Self {
        self.entries.push((None, value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| *k == Some(key))
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_scad(&self, precision: u32) -> String {
        self.entries
            .iter()
            .map(|(key, value)| match key {
                Some(key) => format!("{}={}", key, value.to_scad(precision)),
                None => value.to_scad(precision),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Escape a string for an OpenSCAD double-quoted literal
fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_formatting() {
        assert_eq!(Value::from(5.0).to_scad(4), "5");
        assert_eq!(Value::from(0.0).to_scad(4), "0");
        assert_eq!(Value::from(-0.0).to_scad(4), "0");
        assert_eq!(Value::from(1.23456).to_scad(4), "1.2346");
        assert_eq!(Value::from(-2.5).to_scad(4), "-2.5");
    }

    #[test]
    fn test_composite_values() {
        assert_eq!(Value::from(Vector3::new(1.0, -0.0, 2.5)).to_scad(4), "[1, 0, 2.5]");
        assert_eq!(Value::from(vec![vec![0_usize, 1, 2]]).to_scad(4), "[[0, 1, 2]]");
        assert_eq!(Value::from(true).to_scad(4), "true");
        assert_eq!(Value::from("red").to_scad(4), "\"red\"");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(Value::from("say \"hi\"").to_scad(4), r#""say \"hi\"""#);
        assert_eq!(Value::from(r"C:\fonts").to_scad(4), r#""C:\\fonts""#);
        assert_eq!(Value::from("two\nlines").to_scad(4), r#""two\nlines""#);
    }

    #[test]
    fn test_arguments() {
        let args = Arguments::new()
            .positional("blue")
            .with("h", 10.0)
            .with_opt::<f64>("alpha", None)
            .with("$fn", 78_u32)
            .with("center", true);
        assert_eq!(args.to_scad(4), "\"blue\", h=10, $fn=78, center=true");
        assert_eq!(args.get("h"), Some(&Value::Float(10.0)));
        assert!(args.get("alpha").is_none());
    }
}
