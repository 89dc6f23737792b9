//! Tunables for loading and running documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::MissingVariable;

/// Templating policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOptions {
    #[serde(default)]
    pub missing: MissingVariable,
}

impl TemplateOptions {
    /// Leave unresolvable placeholders untouched instead of failing.
    pub fn preserving() -> Self {
        TemplateOptions {
            missing: MissingVariable::Preserve,
        }
    }
}

/// Options for [`load_with`](crate::loader::load_with) and
/// [`load_str`](crate::loader::load_str).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Outer context every session's `vars` are merged into. Must be a
    /// mapping; anything else is treated as empty.
    #[serde(default = "empty_context")]
    pub context: Value,
    #[serde(default)]
    pub template: TemplateOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            context: empty_context(),
            template: TemplateOptions::default(),
        }
    }
}

impl LoadOptions {
    pub fn with_context(context: Value) -> Self {
        LoadOptions {
            context,
            ..Default::default()
        }
    }
}

/// Options for [`run_session`](crate::runner::run_session).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Stop a session at its first resource that does not pass.
    #[serde(default)]
    pub fail_fast: bool,
    #[serde(default)]
    pub template: TemplateOptions,
}

fn empty_context() -> Value {
    Value::Object(serde_json::Map::new())
}
