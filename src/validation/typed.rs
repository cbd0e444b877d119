//! A small typed schema: parse each field into a JSON value and check simple constraints.

use serde::Deserialize;

use crate::types::{FixedRecord, Record};

use super::{FieldIssue, RecordValidator, ValidationFailure, ValidationResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

/// Constraint checked after a value parses.
///
/// Numeric bounds apply to `Int64`/`Float64` fields; length and `OneOf` checks apply to the
/// trimmed text of any field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Constraint {
    Min(f64),
    Max(f64),
    GreaterThan(f64),
    LessThan(f64),
    MinLength(usize),
    MaxLength(usize),
    OneOf(Vec<String>),
}

/// A single named, typed field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
    /// Blank or missing values become `null` instead of failing with `Required`.
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            optional: false,
            constraints: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Ordered list of typed fields used as a [`RecordValidator`].
///
/// Record columns that have no field here are stripped from the fixed record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TypedSchema {
    fields: Vec<FieldSpec>,
}

impl TypedSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl RecordValidator for TypedSchema {
    fn validate(&self, record: &Record) -> ValidationResult {
        let mut values = serde_json::Map::new();
        let mut issues = Vec::new();

        for field in &self.fields {
            let raw = record.get(&field.name).map(str::trim).unwrap_or("");
            if raw.is_empty() {
                if field.optional {
                    values.insert(field.name.clone(), serde_json::Value::Null);
                } else {
                    issues.push(FieldIssue::new(&field.name, "Required"));
                }
                continue;
            }

            match parse_typed_value(field.data_type, raw) {
                Ok(value) => {
                    let before = issues.len();
                    check_constraints(field, raw, &value, &mut issues);
                    if issues.len() == before {
                        values.insert(field.name.clone(), value);
                    }
                }
                Err(message) => issues.push(FieldIssue::new(&field.name, message)),
            }
        }

        if issues.is_empty() {
            Ok(FixedRecord::for_record(record, values))
        } else {
            Err(ValidationFailure::Fields(issues))
        }
    }
}

fn parse_typed_value(data_type: DataType, raw: &str) -> Result<serde_json::Value, String> {
    match data_type {
        DataType::Utf8 => Ok(serde_json::Value::String(raw.to_owned())),
        DataType::Int64 => raw
            .parse::<i64>()
            .map(serde_json::Value::from)
            .map_err(|_| format!("Expected integer, received '{raw}'")),
        DataType::Float64 => {
            let n = raw
                .parse::<f64>()
                .map_err(|_| format!("Expected number, received '{raw}'"))?;
            serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .ok_or_else(|| format!("Expected finite number, received '{raw}'"))
        }
        DataType::Bool => parse_bool(raw).map(serde_json::Value::Bool),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("Expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

fn check_constraints(field: &FieldSpec, raw: &str, value: &serde_json::Value, issues: &mut Vec<FieldIssue>) {
    let number = value.as_f64();
    for constraint in &field.constraints {
        let message = match (constraint, number) {
            (Constraint::Min(min), Some(n)) if n < *min => format!("Number must be greater than or equal to {min}"),
            (Constraint::Max(max), Some(n)) if n > *max => format!("Number must be less than or equal to {max}"),
            (Constraint::GreaterThan(bound), Some(n)) if n <= *bound => {
                format!("Number must be greater than {bound}")
            }
            (Constraint::LessThan(bound), Some(n)) if n >= *bound => format!("Number must be less than {bound}"),
            (Constraint::MinLength(len), _) if raw.chars().count() < *len => {
                format!("String must contain at least {len} character(s)")
            }
            (Constraint::MaxLength(len), _) if raw.chars().count() > *len => {
                format!("String must contain at most {len} character(s)")
            }
            (Constraint::OneOf(allowed), _) if !allowed.iter().any(|a| a == raw) => {
                format!("Invalid value, expected one of: {}", allowed.join(", "))
            }
            _ => continue,
        };
        issues.push(FieldIssue::new(&field.name, message));
    }
}
