//! `{{ dotted.path }}` substitution over arbitrary value trees.
//!
//! A string that is exactly one placeholder (ignoring surrounding whitespace)
//! becomes the raw context value, type included. Any other string containing
//! placeholders is rendered to a string. Mapping keys are never templated.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::enums::MissingVariable;
use crate::error::{TemplateError, TemplateErrorKind};
use crate::options::TemplateOptions;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").unwrap());

/// Resolve every placeholder in `node` against `context`, failing on the first
/// unresolvable path.
pub fn apply_context(node: &Value, context: &Value) -> Result<Value, TemplateError> {
    apply_context_with(node, context, &TemplateOptions::default())
}

/// [`apply_context`] with an explicit missing-variable policy.
///
/// Neither argument is modified; the result is always a new tree.
pub fn apply_context_with(
    node: &Value,
    context: &Value,
    options: &TemplateOptions,
) -> Result<Value, TemplateError> {
    match node {
        Value::String(s) => apply_to_string(s, context, options),
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), apply_context_with(v, context, options)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|v| apply_context_with(v, context, options))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        // Null, Bool, Number
        _ => Ok(node.clone()),
    }
}

/// Render a template to a string, whatever the placeholders resolve to.
pub fn render_string(
    template: &str,
    context: &Value,
    options: &TemplateOptions,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        match lookup(&caps[1], context, options)? {
            Some(v) => out.push_str(&value_to_string(v)),
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Resolve a dotted path against a context mapping.
///
/// Every segment must name a key of a mapping; there is no sequence
/// indexing.
pub fn resolve_path<'a>(path: &str, context: &'a Value) -> Result<&'a Value, TemplateError> {
    if path.is_empty() {
        return Err(TemplateError {
            kind: TemplateErrorKind::EmptyExpression,
            expression: String::new(),
            message: "empty placeholder".to_string(),
        });
    }

    let mut current = context;
    let mut walked = 0;
    for segment in path.split('.') {
        let Some(obj) = current.as_object() else {
            let message = if walked == 0 {
                "context is not a mapping".to_string()
            } else {
                format!("'{}' is not a mapping", &path[..walked - 1])
            };
            return Err(TemplateError {
                kind: TemplateErrorKind::NotAMapping,
                expression: path.to_string(),
                message,
            });
        };
        match obj.get(segment) {
            Some(v) => current = v,
            None => {
                return Err(TemplateError {
                    kind: TemplateErrorKind::UndefinedVariable,
                    expression: path.to_string(),
                    message: format!("undefined variable '{}'", &path[..walked + segment.len()]),
                });
            }
        }
        walked += segment.len() + 1;
    }
    Ok(current)
}

/// String form of a resolved value inside a larger template.
///
/// Strings are inserted raw; mappings and sequences as compact JSON.
pub fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => serde_json::to_string(v).unwrap_or_default(),
    }
}

fn apply_to_string(
    s: &str,
    context: &Value,
    options: &TemplateOptions,
) -> Result<Value, TemplateError> {
    if !s.contains("{{") {
        return Ok(Value::String(s.to_string()));
    }

    let trimmed = s.trim();
    if let Some(caps) = PLACEHOLDER_RE.captures(trimmed)
        && let Some(whole) = caps.get(0)
        && whole.start() == 0
        && whole.end() == trimmed.len()
    {
        return Ok(match lookup(&caps[1], context, options)? {
            Some(v) => v.clone(),
            None => Value::String(s.to_string()),
        });
    }

    render_string(s, context, options).map(Value::String)
}

/// `Ok(None)` means the path is unresolvable and the policy says keep the
/// placeholder.
fn lookup<'a>(
    expr: &str,
    context: &'a Value,
    options: &TemplateOptions,
) -> Result<Option<&'a Value>, TemplateError> {
    match resolve_path(expr, context) {
        Ok(v) => {
            tracing::trace!(expression = expr, "resolved placeholder");
            Ok(Some(v))
        }
        Err(e) if options.missing == MissingVariable::Preserve => {
            tracing::trace!(expression = expr, error = %e, "placeholder left unresolved");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
