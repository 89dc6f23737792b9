//! Variable mappings: the `key=value[,key=value...]` command-line grammar and
//! context merging.

use serde_json::{Map, Value};

use crate::error::{ArgumentError, ArgumentErrorKind};

/// Parse `key=value[,key=value...]` into a flat mapping of strings.
///
/// Entries split on `,`, then on the first `=`; keys and values are trimmed.
/// An entry without `=` maps its key to the empty string. Later duplicates
/// win.
pub fn parse_vars(input: &str) -> Result<Map<String, Value>, ArgumentError> {
    if input.trim().is_empty() {
        return Err(argument_error("variable list is blank"));
    }

    let mut vars = Map::new();
    for entry in input.split(',') {
        let (key, value) = entry.split_once('=').unwrap_or((entry, ""));
        let key = key.trim();
        if key.is_empty() {
            return Err(argument_error(format!(
                "empty variable name in '{}'",
                entry.trim()
            )));
        }
        vars.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    Ok(vars)
}

/// A new context: `base` with every key of `overrides` laid over it.
///
/// A non-mapping `base` counts as empty. Merging is shallow.
pub fn merge_vars(base: &Value, overrides: &Map<String, Value>) -> Value {
    let mut merged = base.as_object().cloned().unwrap_or_default();
    for (k, v) in overrides {
        merged.insert(k.clone(), v.clone());
    }
    Value::Object(merged)
}

fn argument_error(message: impl Into<String>) -> ArgumentError {
    ArgumentError {
        kind: ArgumentErrorKind::ArgumentType,
        message: message.into(),
    }
}
