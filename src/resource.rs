//! One executable request-plus-assertions unit.

use serde_json::{Map, Value};

use crate::assertions::Assert;
use crate::error::{ParseError, RunError};
use crate::normalize::{expand_action, type_name};
use crate::options::TemplateOptions;
use crate::template::{apply_context_with, value_to_string};
use crate::types::{NormalizedAction, Request, RequestBody, ResolvedRequest};

/// Request fields the resolver turns into a [`ResolvedRequest`]. Anything
/// else is carried in the action but does not reach the wire.
const WIRE_FIELDS: [&str; 4] = ["headers", "params", "body", "json"];

/// Descriptive fields that never reach the wire.
const LABEL_FIELDS: [&str; 2] = ["name", "title"];

/// Session-level request defaults applied under each resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestBase {
    pub base_uri: Option<String>,
    pub headers: Vec<(String, String)>,
}

/// A normalized action. Immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    action: NormalizedAction,
    /// `assert` or `expect`, whichever the action used.
    rules_key: &'static str,
}

/// What [`Resource::resolve`] produces: the wire request and the parsed rules.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedResource {
    pub request: ResolvedRequest,
    pub asserts: Assert,
}

impl Resource {
    /// Normalize `spec`; errors propagate unchanged.
    pub fn new(spec: &Value) -> Result<Self, ParseError> {
        let rules_key = match spec.get("expect") {
            Some(_) => "expect",
            None => "assert",
        };
        Ok(Resource {
            action: expand_action(spec)?,
            rules_key,
        })
    }

    pub fn request(&self) -> &Request {
        &self.action.request
    }

    /// Raw rule specs, possibly still templated.
    pub fn asserts(&self) -> &[Value] {
        &self.action.asserts
    }

    pub fn action(&self) -> &NormalizedAction {
        &self.action
    }

    /// The `name` or `title` label, if the action declares one.
    pub fn name(&self) -> Option<&str> {
        LABEL_FIELDS
            .iter()
            .find_map(|k| self.action.request.fields.get(*k))
            .and_then(Value::as_str)
    }

    /// Template this resource against `context` and build the wire request on
    /// top of `base`. The resource itself is left untouched.
    pub fn resolve(
        &self,
        context: &Value,
        base: &RequestBase,
        options: &TemplateOptions,
    ) -> Result<ResolvedResource, RunError> {
        let request = &self.action.request;

        let raw_url = Value::String(request.url.clone());
        let url = match apply_context_with(&raw_url, context, options)? {
            Value::String(s) => s,
            other => value_to_string(&other),
        };

        let mut fields = Map::new();
        for (key, value) in &request.fields {
            if WIRE_FIELDS.contains(&key.as_str()) {
                fields.insert(key.clone(), apply_context_with(value, context, options)?);
            } else if !LABEL_FIELDS.contains(&key.as_str()) {
                tracing::debug!(field = %key, "ignoring request field");
            }
        }

        let rules = self
            .action
            .asserts
            .iter()
            .map(|rule| apply_context_with(rule, context, options))
            .collect::<Result<Vec<_>, _>>()?;
        let asserts = Assert::from_specs_at(&rules, self.rules_key)?;

        // An empty `headers:` or `params:` parses as null and declares nothing.
        let mut headers = base.headers.clone();
        if let Some(declared) = fields.get("headers").filter(|v| !v.is_null()) {
            for (name, value) in string_pairs(declared, "headers")? {
                set_header(&mut headers, name, value);
            }
        }

        let query = match fields.get("params") {
            None | Some(Value::Null) => Vec::new(),
            Some(params) => string_pairs(params, "params")?,
        };

        let body = match (fields.get("body"), fields.get("json")) {
            (Some(_), Some(_)) => {
                return Err(RunError::Request(
                    "action declares both 'body' and 'json'".to_string(),
                ));
            }
            (Some(Value::Null), None) | (None, Some(Value::Null)) | (None, None) => {
                RequestBody::Empty
            }
            (Some(b @ (Value::Array(_) | Value::Object(_))), None) => {
                return Err(RunError::Request(format!(
                    "'body' must be text, got {}; use 'json' for structured payloads",
                    type_name(b)
                )));
            }
            (Some(b), None) => RequestBody::Text(value_to_string(b)),
            (None, Some(j)) => RequestBody::Json(j.clone()),
        };

        Ok(ResolvedResource {
            request: ResolvedRequest {
                method: request.method,
                url: join_url(base.base_uri.as_deref(), &url),
                headers,
                query,
                body,
            },
            asserts,
        })
    }
}

/// Replace any header of the same name (case-insensitively) with `value`.
pub(crate) fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
    headers.push((name, value));
}

/// Flatten a mapping of scalars into string pairs. A sequence value repeats
/// the key once per element.
pub(crate) fn string_pairs(value: &Value, field: &str) -> Result<Vec<(String, String)>, RunError> {
    let Some(map) = value.as_object() else {
        return Err(RunError::Request(format!(
            "'{}' must be a mapping, got {}",
            field,
            type_name(value)
        )));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (k, v) in map {
        match v {
            Value::Object(_) => {
                return Err(RunError::Request(format!(
                    "'{}.{}' must be a scalar, got mapping",
                    field, k
                )));
            }
            Value::Array(items) => {
                for item in items {
                    pairs.push((k.clone(), value_to_string(item)));
                }
            }
            other => pairs.push((k.clone(), value_to_string(other))),
        }
    }
    Ok(pairs)
}

/// Absolute `http(s)://` urls win; anything else is appended to `base`.
pub fn join_url(base: Option<&str>, url: &str) -> String {
    let absolute = url.starts_with("http://") || url.starts_with("https://");
    match base {
        Some(base) if !absolute && !base.is_empty() => {
            let path = url.trim_start_matches('/');
            if path.is_empty() {
                base.to_string()
            } else {
                format!("{}/{}", base.trim_end_matches('/'), path)
            }
        }
        _ => url.to_string(),
    }
}
