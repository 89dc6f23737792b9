use serde_json::{Map, Value};

use crate::enums::Method;
use crate::error::{ParseError, ParseErrorKind};
use crate::types::{NormalizedAction, Request};

/// Keys that select an assertion rule's kind.
pub(crate) const RULE_KINDS: [&str; 3] = ["status", "header", "body"];

/// Expand one raw action spec into its canonical form.
///
/// Accepts a bare url string (method defaults to `get`), a mapping with
/// explicit `method`/`url`, a mapping with `url` only (method defaults to
/// `get`), or a mapping with a single `{verb: url}` shorthand key. `expect` is
/// accepted as an alias of `assert`. Every other key is passed through.
///
/// Checks run in this order: `assert`/`expect` conflict, then method/url
/// resolution, then the shape of the rule list.
pub fn expand_action(spec: &Value) -> Result<NormalizedAction, ParseError> {
    let map = match spec {
        Value::String(url) => {
            return Ok(NormalizedAction {
                request: Request {
                    method: Method::Get,
                    url: url.clone(),
                    fields: Map::new(),
                },
                asserts: Vec::new(),
            });
        }
        Value::Object(map) => map,
        other => {
            return Err(ParseError::new(
                ParseErrorKind::TypeMismatch,
                format!(
                    "action must be a url string or a mapping, got {}",
                    type_name(other)
                ),
            ));
        }
    };

    let (assert_key, rules) = alias_lookup(map, "assert", "expect").map_err(|_| {
        ParseError::new(
            ParseErrorKind::AssertionConflict,
            "action declares both 'assert' and 'expect'",
        )
    })?;

    let mut fields = map.clone();
    fields.shift_remove("assert");
    fields.shift_remove("expect");

    let (method, url) = resolve_method_url(&mut fields)?;

    let asserts = match rules {
        Some(rules) => rule_list(rules).map_err(|e| e.within(assert_key))?,
        None => Vec::new(),
    };

    Ok(NormalizedAction {
        request: Request {
            method,
            url,
            fields,
        },
        asserts,
    })
}

/// The ordered raw action specs of a session spec.
///
/// Reads `actions` or its alias `requests`. Neither key, a `null` value, or an
/// empty list all yield an empty slice.
pub fn get_actions(container: &Value) -> Result<&[Value], ParseError> {
    keyed_actions(container).map(|(_, actions)| actions)
}

/// [`get_actions`] plus the surface key the list was read from.
pub(crate) fn keyed_actions(container: &Value) -> Result<(&'static str, &[Value]), ParseError> {
    let Some(map) = container.as_object() else {
        return Ok(("actions", &[][..]));
    };

    let (key, actions) = alias_lookup(map, "actions", "requests").map_err(|_| {
        ParseError::new(
            ParseErrorKind::ActionsConflict,
            "session declares both 'actions' and 'requests'",
        )
    })?;

    match actions {
        None | Some(Value::Null) => Ok((key, &[][..])),
        Some(Value::Array(items)) => Ok((key, items.as_slice())),
        Some(other) => Err(ParseError::new(
            ParseErrorKind::TypeMismatch,
            format!("'{}' must be a sequence, got {}", key, type_name(other)),
        )
        .within(key)),
    }
}

/// Look up a canonical key and its alias; both present is a contradiction.
///
/// Returns the surface key that matched (the canonical one when neither did).
fn alias_lookup<'a>(
    map: &'a Map<String, Value>,
    canonical: &'static str,
    alias: &'static str,
) -> Result<(&'static str, Option<&'a Value>), ()> {
    match (map.get(canonical), map.get(alias)) {
        (Some(_), Some(_)) => Err(()),
        (Some(v), None) => Ok((canonical, Some(v))),
        (None, Some(v)) => Ok((alias, Some(v))),
        (None, None) => Ok((canonical, None)),
    }
}

fn resolve_method_url(fields: &mut Map<String, Value>) -> Result<(Method, String), ParseError> {
    if let Some(method) = fields.shift_remove("method") {
        let url = fields.shift_remove("url").ok_or_else(|| {
            ParseError::new(ParseErrorKind::MissingUrl, "action has 'method' but no 'url'")
        })?;
        let method = match &method {
            Value::String(s) => s.parse::<Method>().map_err(|_| {
                ParseError::new(
                    ParseErrorKind::InvalidMethod,
                    format!("invalid method '{}'", s),
                )
                .within("method")
            })?,
            other => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidMethod,
                    format!("method must be a string, got {}", type_name(other)),
                )
                .within("method"));
            }
        };
        return Ok((method, url_string(url, "url")?));
    }

    let verbs: Vec<Method> = Method::ALL
        .into_iter()
        .filter(|m| fields.contains_key(m.as_str()))
        .collect();

    match verbs.as_slice() {
        [] => match fields.shift_remove("url") {
            Some(url) => Ok((Method::Get, url_string(url, "url")?)),
            None => Err(ParseError::new(
                ParseErrorKind::MissingUrl,
                "action has neither 'url' nor a method shorthand",
            )),
        },
        [verb] => {
            if fields.contains_key("url") {
                return Err(ParseError::new(
                    ParseErrorKind::TypeMismatch,
                    format!("action declares both 'url' and '{}' shorthand", verb),
                ));
            }
            let url = fields.shift_remove(verb.as_str()).unwrap_or(Value::Null);
            Ok((*verb, url_string(url, verb.as_str())?))
        }
        many => {
            let names: Vec<&str> = many.iter().map(|m| m.as_str()).collect();
            Err(ParseError::new(
                ParseErrorKind::InvalidMethod,
                format!("action declares several method shorthands: {}", names.join(", ")),
            ))
        }
    }
}

fn url_string(url: Value, key: &str) -> Result<String, ParseError> {
    match url {
        Value::String(s) => Ok(s),
        Value::Null => Err(ParseError::new(ParseErrorKind::MissingUrl, "url is empty").within(key)),
        other => Err(ParseError::new(
            ParseErrorKind::TypeMismatch,
            format!("url must be a string, got {}", type_name(&other)),
        )
        .within(key)),
    }
}

/// Structural check of a rule list. Rule values are left alone since they
/// may still hold placeholders.
fn rule_list(rules: &Value) -> Result<Vec<Value>, ParseError> {
    let items = match rules {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(ParseError::new(
                ParseErrorKind::TypeMismatch,
                format!("assertion rules must be a sequence, got {}", type_name(other)),
            ));
        }
    };

    for (i, rule) in items.iter().enumerate() {
        check_rule_shape(rule).map_err(|e| e.within(&format!("[{}]", i)))?;
    }
    Ok(items.clone())
}

pub(crate) fn check_rule_shape(rule: &Value) -> Result<&Map<String, Value>, ParseError> {
    let Some(map) = rule.as_object() else {
        return Err(ParseError::new(
            ParseErrorKind::InvalidRule,
            format!("assertion rule must be a mapping, got {}", type_name(rule)),
        ));
    };
    let kinds: Vec<&str> = RULE_KINDS
        .into_iter()
        .filter(|k| map.contains_key(*k))
        .collect();
    match kinds.len() {
        1 => Ok(map),
        0 => Err(ParseError::new(
            ParseErrorKind::InvalidRule,
            "assertion rule needs one of 'status', 'header' or 'body'",
        )),
        _ => Err(ParseError::new(
            ParseErrorKind::InvalidRule,
            format!("assertion rule mixes kinds: {}", kinds.join(", ")),
        )),
    }
}

pub(crate) fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
