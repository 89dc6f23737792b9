use crate::enums::RuleKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Error kind for normalization failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    MissingUrl,
    InvalidMethod,
    AssertionConflict,
    ActionsConflict,
    TypeMismatch,
    InvalidRule,
}

/// Produced when a structurally valid document violates normalization rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        ParseError {
            kind,
            message: message.into(),
            path: None,
        }
    }

    /// Prefix the document path with `prefix` (e.g. `actions[1]`).
    pub(crate) fn within(mut self, prefix: &str) -> Self {
        self.path = Some(match self.path.take() {
            Some(inner) if inner.starts_with('[') => format!("{}{}", prefix, inner),
            Some(inner) => format!("{}.{}", prefix, inner),
            None => prefix.to_string(),
        });
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} at {}", self.message, path),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Produced when a document cannot be parsed as YAML at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}: ", file.display())?;
        }
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "{}:{}: {}", line, col, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Error kind for placeholder resolution failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateErrorKind {
    UndefinedVariable,
    NotAMapping,
    EmptyExpression,
}

/// Produced when a `{{ path }}` placeholder cannot be resolved against the
/// context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateError {
    pub kind: TemplateErrorKind,
    /// The dotted path as written inside the braces.
    pub expression: String,
    pub message: String,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{ {} }}}}: {}", self.expression, self.message)
    }
}

impl std::error::Error for TemplateError {}

/// A response that did not satisfy an assertion rule.
///
/// This is a test outcome rather than a fatal error; it carries enough
/// detail for a reporter to render a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Zero-based position of the failing rule; `None` for the implicit
    /// default rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub kind: RuleKind,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "rule #{} ({})", i + 1, self.kind)?,
            None => write!(f, "default rule ({})", self.kind)?,
        }
        write!(
            f,
            ": {}: expected {}, got {}",
            self.message, self.expected, self.actual
        )
    }
}

impl std::error::Error for AssertionFailure {}

/// Error kind for command-line option parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentErrorKind {
    ArgumentType,
}

/// Produced by [`parse_vars`](crate::vars::parse_vars) on malformed input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentError {
    pub kind: ArgumentErrorKind,
    pub message: String,
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ArgumentError {}

/// Produced by an [`HttpClient`](crate::client::HttpClient) when the request
/// could not be completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportError {
    pub message: String,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Error for the load entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    NotFound(PathBuf),
    Io {
        path: PathBuf,
        message: String,
    },
    Syntax(SyntaxError),
    Parse {
        file: Option<PathBuf>,
        error: ParseError,
    },
    Template {
        file: Option<PathBuf>,
        error: TemplateError,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "not found: {}", path.display()),
            LoadError::Io { path, message } => write!(f, "{}: {}", path.display(), message),
            LoadError::Syntax(e) => write!(f, "Syntax error: {}", e),
            LoadError::Parse { file: Some(file), error } => {
                write!(f, "Parse error: {}: {}", file.display(), error)
            }
            LoadError::Parse { file: None, error } => write!(f, "Parse error: {}", error),
            LoadError::Template { file: Some(file), error } => {
                write!(f, "Template error: {}: {}", file.display(), error)
            }
            LoadError::Template { file: None, error } => write!(f, "Template error: {}", error),
        }
    }
}

impl std::error::Error for LoadError {}

/// Why a resource could not be executed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "error", rename_all = "snake_case")]
pub enum RunError {
    Template(TemplateError),
    Parse(ParseError),
    Request(String),
    Transport(TransportError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Template(e) => write!(f, "Template error: {}", e),
            RunError::Parse(e) => write!(f, "Parse error: {}", e),
            RunError::Request(msg) => write!(f, "Invalid request: {}", msg),
            RunError::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}

impl std::error::Error for RunError {}

impl From<TemplateError> for RunError {
    fn from(e: TemplateError) -> Self {
        RunError::Template(e)
    }
}

impl From<ParseError> for RunError {
    fn from(e: ParseError) -> Self {
        RunError::Parse(e)
    }
}

impl From<TransportError> for RunError {
    fn from(e: TransportError) -> Self {
        RunError::Transport(e)
    }
}

/// Why a session spec could not be turned into a [`Session`](crate::session::Session).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    Parse(ParseError),
    Template(TemplateError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Parse(e) => write!(f, "Parse error: {}", e),
            SessionError::Template(e) => write!(f, "Template error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ParseError> for SessionError {
    fn from(e: ParseError) -> Self {
        SessionError::Parse(e)
    }
}

impl From<TemplateError> for SessionError {
    fn from(e: TemplateError) -> Self {
        SessionError::Template(e)
    }
}
