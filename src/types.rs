use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::Method;

// ─── Normalized action ──────────────────────────────────────────────────────

/// Method, url and the untouched request fields of one action.
///
/// `url` and `fields` may still contain `{{ }}` placeholders; they are
/// resolved at execution time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Every other key of the action spec (`headers`, `body`, `json`, ...),
    /// in declaration order.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Canonical shape of one action spec after alias/shorthand expansion.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedAction {
    pub request: Request,
    /// Raw assertion rule specs under the canonical `assert` key.
    pub asserts: Vec<Value>,
}

impl NormalizedAction {
    /// The canonical mapping `{method, url, ...fields, assert}`.
    ///
    /// `assert` is omitted when no rules were declared.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "method".to_string(),
            Value::String(self.request.method.as_str().to_string()),
        );
        map.insert("url".to_string(), Value::String(self.request.url.clone()));
        for (k, v) in &self.request.fields {
            map.insert(k.clone(), v.clone());
        }
        if !self.asserts.is_empty() {
            map.insert("assert".to_string(), Value::Array(self.asserts.clone()));
        }
        Value::Object(map)
    }
}

// ─── Resolved request ───────────────────────────────────────────────────────

/// Payload of a resolved request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    #[default]
    Empty,
    Text(String),
    Json(Value),
}

/// A fully templated request, ready for an [`HttpClient`](crate::client::HttpClient).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ResolvedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup_header(&self.headers, name)
    }
}

// ─── Response ───────────────────────────────────────────────────────────────

/// What an HTTP client hands back for assertion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub headers: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Response {
            status,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Case-insensitive header lookup; the first matching header wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup_header(&self.headers, name)
    }

    /// Status within the inclusive success range [200, 299].
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

fn lookup_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
