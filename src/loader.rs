//! File and directory entry points.
//!
//! ```text
//! load(path) → discover → parse(yaml) → Session::new per session spec
//! ```

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, ParseError, ParseErrorKind, SessionError, SyntaxError};
use crate::normalize::type_name;
use crate::options::LoadOptions;
use crate::session::Session;

/// Extensions picked up when loading a directory.
pub const SPEC_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Load every session under `path` with default options.
///
/// See [`load_with`].
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Session>, LoadError> {
    load_with(path, &LoadOptions::default())
}

/// Load every session under `path`.
///
/// A file yields the sessions it declares; a directory yields the sessions of
/// each document [`discover`] finds, in that order. Any failing document
/// fails the whole call. Sessions without resources are dropped.
pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Vec<Session>, LoadError> {
    let path = path.as_ref();
    let meta = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    if !meta.is_dir() {
        return load_file(path, options);
    }

    let mut sessions = Vec::new();
    for file in discover(path)? {
        sessions.extend(load_file(&file, options)?);
    }
    Ok(sessions)
}

/// Load the sessions declared by an in-memory document.
pub fn load_str(input: &str, options: &LoadOptions) -> Result<Vec<Session>, LoadError> {
    build_sessions(&parse_document(input, None)?, None, options)
}

/// Spec documents directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_error = |e: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_spec = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SPEC_EXTENSIONS.contains(&ext));
        if is_spec && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    tracing::debug!(dir = %dir.display(), documents = files.len(), "discovered spec documents");
    Ok(files)
}

fn load_file(path: &Path, options: &LoadOptions) -> Result<Vec<Session>, LoadError> {
    tracing::debug!(file = %path.display(), "loading spec document");
    let input = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let doc = parse_document(&input, Some(path))?;
    build_sessions(&doc, Some(path), options)
}

/// YAML text to a value tree. Blank or comment-only input is `null`.
fn parse_document(input: &str, file: Option<&Path>) -> Result<Value, LoadError> {
    let syntax_error = |message: String| {
        LoadError::Syntax(SyntaxError {
            message,
            file: file.map(Path::to_path_buf),
            line: None,
            column: None,
        })
    };

    if is_blank_document(input) {
        return Ok(Value::Null);
    }
    check_multi_document(input).map_err(syntax_error)?;

    serde_saphyr::from_str::<Value>(input).map_err(|e| syntax_error(e.to_string()))
}

fn is_blank_document(input: &str) -> bool {
    input.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---"
    })
}

/// Only `---` at column 0 counts as a document marker.
fn check_multi_document(input: &str) -> Result<(), String> {
    let markers = input
        .lines()
        .filter(|line| line.starts_with("---") && line[3..].trim().is_empty())
        .count();
    if markers > 1 {
        return Err("multi-document YAML is not supported".to_string());
    }
    Ok(())
}

fn build_sessions(
    doc: &Value,
    file: Option<&Path>,
    options: &LoadOptions,
) -> Result<Vec<Session>, LoadError> {
    let specs: Vec<(Option<String>, &Value)> = match doc {
        Value::Null => Vec::new(),
        Value::Object(_) => vec![(None, doc)],
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (Some(format!("[{}]", i)), item))
            .collect(),
        other => {
            return Err(LoadError::Parse {
                file: file.map(Path::to_path_buf),
                error: ParseError::new(
                    ParseErrorKind::TypeMismatch,
                    format!(
                        "document root must be a mapping or a sequence of mappings, got {}",
                        type_name(other)
                    ),
                ),
            });
        }
    };

    let mut sessions = Vec::new();
    for (prefix, spec) in specs {
        let session = Session::new(spec, &options.context, &options.template)
            .map_err(|e| session_error(e, prefix.as_deref(), file))?;
        if session.is_empty() {
            tracing::debug!(
                title = session.title().unwrap_or(""),
                "skipping session without resources"
            );
            continue;
        }
        sessions.push(session);
    }
    Ok(sessions)
}

fn session_error(error: SessionError, prefix: Option<&str>, file: Option<&Path>) -> LoadError {
    let file = file.map(Path::to_path_buf);
    match error {
        SessionError::Parse(e) => LoadError::Parse {
            file,
            error: match prefix {
                Some(prefix) => e.within(prefix),
                None => e,
            },
        },
        SessionError::Template(error) => LoadError::Template { file, error },
    }
}
