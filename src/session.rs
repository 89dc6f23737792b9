//! An ordered group of resources sharing a base URI, headers and variables.

use serde_json::{Map, Value};

use crate::error::{ParseError, ParseErrorKind, RunError, SessionError};
use crate::normalize::{keyed_actions, type_name};
use crate::options::TemplateOptions;
use crate::resource::{RequestBase, ResolvedResource, Resource, set_header};
use crate::template::{apply_context_with, value_to_string};
use crate::vars::merge_vars;

/// A session built from one session-level spec.
///
/// `baseUri` and `headers` are templated when the session is built; each
/// resource is templated later, when it runs, against [`Session::context`].
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    title: Option<String>,
    base: RequestBase,
    vars: Map<String, Value>,
    context: Value,
    resources: Vec<Resource>,
}

impl Session {
    /// Build a session, merging its `vars` over `outer` (local keys win).
    ///
    /// Any failing resource aborts the whole session.
    pub fn new(
        spec: &Value,
        outer: &Value,
        options: &TemplateOptions,
    ) -> Result<Self, SessionError> {
        let Some(map) = spec.as_object() else {
            return Err(ParseError::new(
                ParseErrorKind::TypeMismatch,
                format!("session must be a mapping, got {}", type_name(spec)),
            )
            .into());
        };

        let title = match map.get("title") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(value_to_string(other)),
        };

        let vars = match map.get("vars") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(vars)) => vars.clone(),
            Some(other) => {
                return Err(ParseError::new(
                    ParseErrorKind::TypeMismatch,
                    format!("'vars' must be a mapping, got {}", type_name(other)),
                )
                .within("vars")
                .into());
            }
        };
        let context = merge_vars(outer, &vars);

        let base_uri = match map.get("baseUri") {
            None | Some(Value::Null) => None,
            Some(raw @ Value::String(_)) => match apply_context_with(raw, &context, options)? {
                Value::String(s) => Some(s),
                other => Some(value_to_string(&other)),
            },
            Some(other) => {
                return Err(ParseError::new(
                    ParseErrorKind::TypeMismatch,
                    format!("'baseUri' must be a string, got {}", type_name(other)),
                )
                .within("baseUri")
                .into());
            }
        };

        let headers = match map.get("headers") {
            None | Some(Value::Null) => Vec::new(),
            Some(raw @ Value::Object(_)) => {
                header_pairs(&apply_context_with(raw, &context, options)?)?
            }
            Some(other) => {
                return Err(ParseError::new(
                    ParseErrorKind::TypeMismatch,
                    format!("'headers' must be a mapping, got {}", type_name(other)),
                )
                .within("headers")
                .into());
            }
        };

        let (actions_key, actions) = keyed_actions(spec)?;
        let resources = actions
            .iter()
            .enumerate()
            .map(|(i, action)| {
                Resource::new(action).map_err(|e| e.within(&format!("{}[{}]", actions_key, i)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            title = title.as_deref().unwrap_or(""),
            base_uri = base_uri.as_deref().unwrap_or(""),
            resources = resources.len(),
            "built session"
        );

        Ok(Session {
            title,
            base: RequestBase { base_uri, headers },
            vars,
            context,
            resources,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The templated base URI.
    pub fn base_uri(&self) -> Option<&str> {
        self.base.base_uri.as_deref()
    }

    /// The templated session headers, in declaration order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.base.headers
    }

    pub fn request_base(&self) -> &RequestBase {
        &self.base
    }

    /// The session's own `vars`, before merging.
    pub fn vars(&self) -> &Map<String, Value> {
        &self.vars
    }

    /// Outer context with `vars` merged over it.
    pub fn context(&self) -> &Value {
        &self.context
    }

    /// Resources in declaration order, which is also execution order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Template `resource` against `context` on top of this session's base.
    ///
    /// `context` is passed in rather than read from the session so a runner
    /// can extend it between resources.
    pub fn resolve(
        &self,
        resource: &Resource,
        context: &Value,
        options: &TemplateOptions,
    ) -> Result<ResolvedResource, RunError> {
        resource.resolve(context, &self.base, options)
    }
}

fn header_pairs(headers: &Value) -> Result<Vec<(String, String)>, ParseError> {
    let mut pairs = Vec::new();
    if let Some(map) = headers.as_object() {
        for (name, value) in map {
            match value {
                Value::Array(_) | Value::Object(_) => {
                    return Err(ParseError::new(
                        ParseErrorKind::TypeMismatch,
                        format!("header value must be a scalar, got {}", type_name(value)),
                    )
                    .within(&format!("headers.{}", name)));
                }
                other => set_header(&mut pairs, name.clone(), value_to_string(other)),
            }
        }
    }
    Ok(pairs)
}
