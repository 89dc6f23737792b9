//! Assertion rules and their evaluation against a [`Response`].
//!
//! Rules run in declaration order with AND semantics; the first failing rule
//! stops evaluation. An empty rule list means the implicit default rule:
//! status in [200, 299].

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::enums::RuleKind;
use crate::error::{AssertionFailure, ParseError, ParseErrorKind};
use crate::normalize::{check_rule_shape, type_name};
use crate::template::value_to_string;
use crate::types::Response;

// ─── Status matching ────────────────────────────────────────────────────────

/// One acceptable status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMatcher {
    Exact(u16),
    /// `<digit>xx`: the hundreds digit must equal this value.
    Class(u8),
}

impl StatusMatcher {
    pub fn parse(raw: &str) -> Option<StatusMatcher> {
        let raw = raw.trim();
        let bytes = raw.as_bytes();
        let is_class = bytes.len() == 3
            && bytes[0].is_ascii_digit()
            && bytes[1..].eq_ignore_ascii_case(b"xx");
        if is_class {
            return Some(StatusMatcher::Class(bytes[0] - b'0'));
        }
        raw.parse::<u16>().ok().map(StatusMatcher::Exact)
    }

    pub fn matches(&self, status: u16) -> bool {
        match *self {
            StatusMatcher::Exact(code) => code == status,
            StatusMatcher::Class(digit) => status / 100 == u16::from(digit),
        }
    }
}

impl fmt::Display for StatusMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMatcher::Exact(code) => write!(f, "{}", code),
            StatusMatcher::Class(digit) => write!(f, "{}xx", digit),
        }
    }
}

// ─── Text checks ────────────────────────────────────────────────────────────

/// Modifier shared by header and body rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCheck {
    Present,
    Is(String),
    Contains(String),
}

impl TextCheck {
    fn from_rule(map: &Map<String, Value>) -> Result<TextCheck, ParseError> {
        match (map.get("is"), map.get("contains")) {
            (Some(_), Some(_)) => Err(ParseError::new(
                ParseErrorKind::InvalidRule,
                "rule declares both 'is' and 'contains'",
            )),
            (Some(v), None) => Ok(TextCheck::Is(scalar_text(v, "is")?)),
            (None, Some(v)) => Ok(TextCheck::Contains(scalar_text(v, "contains")?)),
            (None, None) => Ok(TextCheck::Present),
        }
    }

    /// `Err((expected, actual))` on mismatch.
    fn check(&self, subject: &str, actual: Option<&str>) -> Result<(), (String, String)> {
        let shown = || {
            actual
                .map(|a| format!("'{}'", a))
                .unwrap_or_else(|| "nothing".to_string())
        };
        match (self, actual) {
            (TextCheck::Present, Some(a)) if !a.is_empty() => Ok(()),
            (TextCheck::Present, _) => Err((format!("{} present", subject), shown())),
            (TextCheck::Is(want), Some(a)) if a == want => Ok(()),
            (TextCheck::Is(want), _) => Err((format!("{} == '{}'", subject, want), shown())),
            (TextCheck::Contains(want), Some(a)) if a.contains(want.as_str()) => Ok(()),
            (TextCheck::Contains(want), _) => {
                Err((format!("{} containing '{}'", subject, want), shown()))
            }
        }
    }
}

fn scalar_text(v: &Value, key: &str) -> Result<String, ParseError> {
    match v {
        Value::Array(_) | Value::Object(_) => Err(ParseError::new(
            ParseErrorKind::InvalidRule,
            format!("'{}' must be a scalar, got {}", key, type_name(v)),
        )
        .within(key)),
        other => Ok(value_to_string(other)),
    }
}

// ─── AssertionRule ──────────────────────────────────────────────────────────

/// One parsed, immutable assertion rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssertionRule {
    /// Passes when the status matches any of the listed matchers.
    Status { any_of: Vec<StatusMatcher> },
    /// Header presence, checked by case-insensitive name.
    Header { name: String, check: TextCheck },
    /// Textual body check.
    Body { check: TextCheck },
}

impl AssertionRule {
    /// Parse a rule spec. Placeholders must already be resolved.
    pub fn parse(spec: &Value) -> Result<AssertionRule, ParseError> {
        let map = check_rule_shape(spec)?;

        if let Some(status) = map.get("status") {
            return parse_status(status)
                .map(|any_of| AssertionRule::Status { any_of })
                .map_err(|e| e.within("status"));
        }

        if let Some(header) = map.get("header") {
            let name = match header {
                Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
                other => {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidRule,
                        format!(
                            "header name must be a non-empty string, got {}",
                            type_name(other)
                        ),
                    )
                    .within("header"));
                }
            };
            return Ok(AssertionRule::Header {
                name,
                check: TextCheck::from_rule(map)?,
            });
        }

        match map.get("body") {
            Some(Value::String(kind)) if kind == "text" => Ok(AssertionRule::Body {
                check: TextCheck::from_rule(map)?,
            }),
            Some(other) => Err(ParseError::new(
                ParseErrorKind::InvalidRule,
                format!("unsupported body check {}", value_to_string(other)),
            )
            .within("body")),
            None => Err(ParseError::new(ParseErrorKind::InvalidRule, "rule declares no check")),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            AssertionRule::Status { .. } => RuleKind::Status,
            AssertionRule::Header { .. } => RuleKind::Header,
            AssertionRule::Body { .. } => RuleKind::Body,
        }
    }

    /// `Err((expected, actual, message))` when the response does not satisfy
    /// this rule.
    fn check(&self, response: &Response) -> Result<(), (String, String, String)> {
        match self {
            AssertionRule::Status { any_of } => {
                if any_of.iter().any(|m| m.matches(response.status)) {
                    return Ok(());
                }
                let expected = match any_of.as_slice() {
                    [single] => single.to_string(),
                    many => format!(
                        "one of [{}]",
                        many.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
                    ),
                };
                Err((expected, status_line(response), "unexpected status".to_string()))
            }
            AssertionRule::Header { name, check } => {
                let value = response.header(name);
                // An empty header value still counts as present.
                if *check == TextCheck::Present && value.is_some() {
                    return Ok(());
                }
                check
                    .check(&format!("header '{}'", name), value)
                    .map_err(|(e, a)| (e, a, format!("header '{}' mismatch", name)))
            }
            AssertionRule::Body { check } => check
                .check("body text", response.text.as_deref())
                .map_err(|(e, a)| (e, a, "body text mismatch".to_string())),
        }
    }
}

fn parse_status(value: &Value) -> Result<Vec<StatusMatcher>, ParseError> {
    match value {
        Value::Array(items) if items.is_empty() => Err(ParseError::new(
            ParseErrorKind::InvalidRule,
            "status list must not be empty",
        )),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| single_status(item).map_err(|e| e.within(&format!("[{}]", i))))
            .collect(),
        other => single_status(other).map(|m| vec![m]),
    }
}

fn single_status(value: &Value) -> Result<StatusMatcher, ParseError> {
    let parsed = match value {
        Value::String(s) => StatusMatcher::parse(s),
        Value::Number(n) => n
            .as_u64()
            .and_then(|c| u16::try_from(c).ok())
            .map(StatusMatcher::Exact),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::InvalidRule,
            format!("invalid status matcher {}", value_to_string(value)),
        )
    })
}

fn status_line(response: &Response) -> String {
    match &response.reason {
        Some(reason) if !reason.is_empty() => format!("{} {}", response.status, reason),
        _ => response.status.to_string(),
    }
}

// ─── Assert ─────────────────────────────────────────────────────────────────

/// An ordered rule set judged against one response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Assert {
    rules: Vec<AssertionRule>,
}

impl Assert {
    pub fn new(rules: Vec<AssertionRule>) -> Self {
        Assert { rules }
    }

    /// Parse each spec, tagging errors with the rule position under `assert`.
    pub fn from_specs(specs: &[Value]) -> Result<Self, ParseError> {
        Self::from_specs_at(specs, "assert")
    }

    /// Like [`Assert::from_specs`], with error paths rooted at `key`.
    pub fn from_specs_at(specs: &[Value], key: &str) -> Result<Self, ParseError> {
        let rules = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                AssertionRule::parse(spec).map_err(|e| e.within(&format!("{}[{}]", key, i)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Assert { rules })
    }

    pub fn rules(&self) -> &[AssertionRule] {
        &self.rules
    }

    /// True when only the implicit default rule applies.
    pub fn is_default(&self) -> bool {
        self.rules.is_empty()
    }

    /// Judge `response`; the first failing rule is reported.
    pub fn test(&self, response: &Response) -> Result<(), AssertionFailure> {
        if self.rules.is_empty() {
            if response.is_ok() {
                return Ok(());
            }
            return Err(AssertionFailure {
                index: None,
                kind: RuleKind::Ok,
                expected: "2xx".to_string(),
                actual: status_line(response),
                message: "response is not ok".to_string(),
            });
        }

        for (i, rule) in self.rules.iter().enumerate() {
            if let Err((expected, actual, message)) = rule.check(response) {
                return Err(AssertionFailure {
                    index: Some(i),
                    kind: rule.kind(),
                    expected,
                    actual,
                    message,
                });
            }
        }
        Ok(())
    }
}
