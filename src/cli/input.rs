//! Operation lists supplied on the command line
//!
//! Inline specs look like `kind` or `kind:key=value;key=value`. A value with
//! commas becomes a list of strings, a numeric value becomes a number and
//! anything else stays a string. Column names always stay strings.

use crate::constants::parameters;
use crate::error::{CleanerError, Result};
use crate::models::{OperationDescriptor, Parameters};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

fn spec_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?P<kind>[A-Za-z][A-Za-z0-9_\-]*)\s*(?::(?P<params>.*))?$")
            .unwrap_or_else(|e| panic!("invalid operation spec pattern: {}", e))
    })
}

fn parameter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?P<key>[A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?P<value>.*?)\s*$")
            .unwrap_or_else(|e| panic!("invalid operation parameter pattern: {}", e))
    })
}

/// Parse one inline operation spec
pub fn parse_operation_spec(spec: &str) -> Result<OperationDescriptor> {
    let captures = spec_pattern().captures(spec).ok_or_else(|| {
        CleanerError::invalid_parameter("op", format!("'{}' is not of the form kind[:key=value;...]", spec))
    })?;

    let mut descriptor = OperationDescriptor::new(&captures["kind"]);

    let params = captures.name("params").map_or("", |m| m.as_str());
    for pair in params.split(';').filter(|pair| !pair.trim().is_empty()) {
        let parameter = parameter_pattern().captures(pair).ok_or_else(|| {
            CleanerError::invalid_parameter("op", format!("'{}' in '{}' is not key=value", pair, spec))
        })?;
        let key = &parameter["key"];
        descriptor = descriptor.with_parameter(key, parse_value(key, &parameter["value"]));
    }

    Ok(descriptor)
}

fn parse_value(key: &str, raw: &str) -> Value {
    let names_columns = key == parameters::COLUMNS || key == parameters::COLUMNS_ALIAS;
    if raw.contains(',') {
        return Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        );
    }
    if names_columns {
        return Value::String(raw.to_string());
    }
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::from(integer);
    }
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => Value::from(number),
        _ => Value::String(raw.to_string()),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OperationsDocument {
    List(Vec<OperationDescriptor>),
    Wrapped { operations: Vec<OperationDescriptor> },
}

/// Parse a JSON document holding either a list of operations or an object
/// with an `operations` list
pub fn parse_operations_json(text: &str) -> Result<Vec<OperationDescriptor>> {
    let document: OperationsDocument = serde_json::from_str(text).map_err(|e| {
        CleanerError::invalid_parameter("operations", format!("not a list of operations: {}", e))
    })?;
    Ok(match document {
        OperationsDocument::List(operations) => operations,
        OperationsDocument::Wrapped { operations } => operations,
    })
}

pub fn load_operations_file(path: &Path) -> Result<Vec<OperationDescriptor>> {
    let text = std::fs::read_to_string(path).map_err(|e| CleanerError::io(path, e))?;
    parse_operations_json(&text)
}

/// Parameters of a descriptor rendered as `key=value` pairs for display
pub fn describe_parameters(parameters: &Parameters) -> String {
    parameters
        .iter()
        .map(|(key, value)| match value {
            Value::String(text) => format!("{}={}", key, text),
            other => format!("{}={}", key, other),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
