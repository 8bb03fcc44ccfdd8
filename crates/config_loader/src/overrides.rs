//! Command line overrides
//!
//! `section.key=value` replaces an existing key. `+section.key=value` may also
//! create it. Values are read as JSON scalars when they parse as one
//! (numbers, booleans, `null`), otherwise they are kept as strings.

use contracts::ContractError;
use serde_json::{Map, Value};

/// Parsed override expression
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    /// Dotted key path, split into segments
    pub path: Vec<String>,
    /// Replacement value
    pub value: Value,
    /// Whether the key may be created (`+` prefix)
    pub allow_create: bool,
}

impl Override {
    /// Parse `[+]a.b.c=value`
    pub fn parse(expression: &str) -> Result<Self, ContractError> {
        let (raw_key, raw_value) = expression
            .split_once('=')
            .ok_or_else(|| ContractError::config_override(expression, "expected key=value"))?;

        let (allow_create, key) = match raw_key.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, raw_key),
        };

        let path: Vec<String> = key.trim().split('.').map(str::to_string).collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(ContractError::config_override(
                expression,
                "key path contains an empty segment",
            ));
        }

        Ok(Self {
            path,
            value: parse_scalar(raw_value),
            allow_create,
        })
    }

    /// Dotted key, for messages
    pub fn key(&self) -> String {
        self.path.join(".")
    }

    /// Apply to a parsed document
    pub fn apply(&self, document: &mut Value) -> Result<(), ContractError> {
        let (leaf, parents) = self
            .path
            .split_last()
            .ok_or_else(|| ContractError::config_override(self.key(), "empty key"))?;

        let mut node = document;
        for segment in parents {
            let map = as_mapping(node, &self.key())?;
            if !map.contains_key(segment) {
                if !self.allow_create {
                    return Err(self.missing_key_error());
                }
                map.insert(segment.clone(), Value::Object(Map::new()));
            }
            node = map
                .get_mut(segment)
                .ok_or_else(|| self.missing_key_error())?;
        }

        let map = as_mapping(node, &self.key())?;
        if !map.contains_key(leaf) && !self.allow_create {
            return Err(self.missing_key_error());
        }
        map.insert(leaf.clone(), self.value.clone());
        Ok(())
    }

    fn missing_key_error(&self) -> ContractError {
        ContractError::config_override(
            self.key(),
            format!(
                "key not found in configuration (use '+{}=...' to add it)",
                self.key()
            ),
        )
    }
}

/// Parse and apply every expression in order
pub fn apply_all(document: &mut Value, expressions: &[String]) -> Result<(), ContractError> {
    for expression in expressions {
        let parsed = Override::parse(expression)?;
        parsed.apply(document)?;
        tracing::debug!(key = %parsed.key(), value = %parsed.value, "Applied config override");
    }
    Ok(())
}

fn as_mapping<'a>(node: &'a mut Value, key: &str) -> Result<&'a mut Map<String, Value>, ContractError> {
    node.as_object_mut()
        .ok_or_else(|| ContractError::config_override(key, "parent of the key is not a mapping"))
}

fn parse_scalar(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Null | Value::Bool(_) | Value::Number(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}
