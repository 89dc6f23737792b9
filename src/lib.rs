//! Declarative HTTP test runner.
//!
//! Scenarios are YAML documents describing requests to issue and assertions
//! to run against the responses. This crate turns those documents into
//! validated [`Session`]s, resolves `{{ variable }}` placeholders, and judges
//! responses:
//!
//! ```text
//! load(path) → [Session] ─┬─ Session::new: vars merged, baseUri/headers templated
//!                         └─ Resource::new: expand_action(spec)
//! run_session(session, client) → Resource::resolve(context) → HttpClient::send
//!                              → Assert::test(response) → SessionReport
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use restspec::{LoadOptions, Response, load_str};
//! use serde_json::json;
//!
//! let yaml = r#"
//! title: health
//! baseUri: "http://{{host}}"
//! actions:
//!   - get: /status
//!     expect:
//!       - status: 2xx
//!       - header: Content-Type
//!         contains: json
//! "#;
//!
//! let options = LoadOptions::with_context(json!({"host": "localhost:8080"}));
//! let sessions = load_str(yaml, &options).expect("valid document");
//! let session = &sessions[0];
//! let resolved = session
//!     .resolve(&session.resources()[0], session.context(), &Default::default())
//!     .expect("resolvable");
//! assert_eq!(resolved.request.url, "http://localhost:8080/status");
//!
//! let response = Response::new(200).with_header("content-type", "application/json");
//! assert!(resolved.asserts.test(&response).is_ok());
//! ```
//!
//! # Feature Flags
//!
//! | Feature       | Default | Description |
//! |---------------|---------|-------------|
//! | `http-client` | yes     | Blocking HTTP transport via [`reqwest`](https://docs.rs/reqwest). Enables [`client::ReqwestClient`]. |

pub mod assertions;
pub mod client;
pub mod enums;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod options;
pub mod resource;
pub mod runner;
pub mod session;
pub mod template;
pub mod types;
pub mod vars;

pub use enums::*;
pub use error::*;
pub use options::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use assertions::{Assert, AssertionRule};
pub use client::HttpClient;
pub use loader::{load, load_str, load_with};
pub use normalize::{expand_action, get_actions};
pub use resource::Resource;
pub use runner::{run_all, run_session};
pub use session::Session;
pub use template::apply_context;
pub use vars::parse_vars;
