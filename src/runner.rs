//! Sequential execution of sessions against an [`HttpClient`].

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::client::HttpClient;
use crate::enums::Method;
use crate::error::{AssertionFailure, RunError};
use crate::options::RunOptions;
use crate::resource::Resource;
use crate::session::Session;

/// How one resource ended.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    /// The response came back but broke a rule.
    Failed(AssertionFailure),
    /// The resource could not be executed at all.
    Errored(RunError),
}

/// Result of one resource execution.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub method: Method,
    /// The resolved url when templating succeeded, the raw one otherwise.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub outcome: Outcome,
}

impl ResourceReport {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Results of one session, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub resources: Vec<ResourceReport>,
    /// Resources not executed because `fail_fast` stopped the session.
    pub skipped: usize,
}

impl SessionReport {
    pub fn passed(&self) -> bool {
        self.skipped == 0 && self.resources.iter().all(ResourceReport::passed)
    }

    pub fn passed_count(&self) -> usize {
        self.resources.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed(_)))
            .count()
    }

    pub fn errored_count(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Errored(_)))
            .count()
    }
}

/// Execute every resource of `session` in declaration order.
///
/// Each resource is templated against the session context right before it is
/// sent. With [`RunOptions::fail_fast`] the session stops at the first
/// resource that does not pass.
pub fn run_session(
    session: &Session,
    client: &dyn HttpClient,
    options: &RunOptions,
) -> SessionReport {
    let mut report = SessionReport {
        title: session.title().map(str::to_string),
        ..Default::default()
    };

    for (index, resource) in session.resources().iter().enumerate() {
        let result = run_resource(session, resource, index, client, options);
        let stop = options.fail_fast && !result.passed();
        report.resources.push(result);
        if stop {
            report.skipped = session.len() - index - 1;
            tracing::debug!(skipped = report.skipped, "fail-fast stopped session");
            break;
        }
    }
    report
}

/// Run several sessions one after another.
pub fn run_all(
    sessions: &[Session],
    client: &dyn HttpClient,
    options: &RunOptions,
) -> Vec<SessionReport> {
    sessions
        .iter()
        .map(|s| run_session(s, client, options))
        .collect()
}

fn run_resource(
    session: &Session,
    resource: &Resource,
    index: usize,
    client: &dyn HttpClient,
    options: &RunOptions,
) -> ResourceReport {
    let started = Instant::now();
    let mut report = ResourceReport {
        index,
        name: resource.name().map(str::to_string),
        method: resource.request().method,
        url: resource.request().url.clone(),
        status: None,
        elapsed: Duration::ZERO,
        outcome: Outcome::Passed,
    };

    let resolved = match session.resolve(resource, session.context(), &options.template) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(index, error = %e, "resource could not be resolved");
            report.outcome = Outcome::Errored(e);
            report.elapsed = started.elapsed();
            return report;
        }
    };
    report.url = resolved.request.url.clone();

    let response = match client.send(&resolved.request) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                index,
                method = %report.method,
                url = %report.url,
                error = %e,
                "transport error"
            );
            report.outcome = Outcome::Errored(e.into());
            report.elapsed = started.elapsed();
            return report;
        }
    };
    report.status = Some(response.status);
    report.elapsed = started.elapsed();

    tracing::info!(
        index,
        method = %report.method,
        url = %report.url,
        status = response.status,
        "executed resource"
    );

    if let Err(failure) = resolved.asserts.test(&response) {
        tracing::warn!(index, failure = %failure, "assertion failed");
        report.outcome = Outcome::Failed(failure);
    }
    report
}
