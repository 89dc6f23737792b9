use restspec::assertions::Assert;
use restspec::enums::RuleKind;
use restspec::error::ParseErrorKind;
use restspec::types::Response;
use serde_json::{Value, json};

fn assert_from(spec: Value) -> Assert {
    let rules = spec.as_array().expect("rule list").clone();
    Assert::from_specs(&rules).expect("rules parse")
}

#[test]
fn response_ok() {
    assert!(Assert::default().test(&Response::new(200)).is_ok());
}

#[test]
fn response_not_ok() {
    let err = Assert::default().test(&Response::new(404)).unwrap_err();
    assert_eq!(err.kind, RuleKind::Ok);
    assert_eq!(err.actual, "404");
}

#[test]
fn status_exact() {
    let assertion = assert_from(json!([{"status": "500"}]));
    assert!(assertion.test(&Response::new(500)).is_ok());
    let err = assertion.test(&Response::new(501)).unwrap_err();
    assert_eq!(err.index, Some(0));
    assert_eq!(err.kind, RuleKind::Status);
    assert_eq!(err.expected, "500");
    assert_eq!(err.actual, "501");
}

#[test]
fn status_class_pattern() {
    let assertion = assert_from(json!([{"status": "4xx"}]));
    for status in [400, 403, 451, 499] {
        assert!(assertion.test(&Response::new(status)).is_ok(), "{status}");
    }
    assert!(assertion.test(&Response::new(501)).is_err());
    assert!(assertion.test(&Response::new(399)).is_err());
}

#[test]
fn status_list() {
    let assertion = assert_from(json!([{"status": ["401"]}]));
    assert!(assertion.test(&Response::new(401)).is_ok());
    assert!(assertion.test(&Response::new(404)).is_err());
}

#[test]
fn status_list_mixes_exact_and_class() {
    let assertion = assert_from(json!([{"status": ["204", "3xx"]}]));
    assert!(assertion.test(&Response::new(204)).is_ok());
    assert!(assertion.test(&Response::new(302)).is_ok());
    let err = assertion.test(&Response::new(200)).unwrap_err();
    assert_eq!(err.expected, "one of [204, 3xx]");
}

#[test]
fn header_exists() {
    let assertion = assert_from(json!([{"header": "Content-Type"}]));
    let resp = Response::new(200).with_header("Content-Type", "text/plain");
    assert!(assertion.test(&resp).is_ok());
    let resp = Response::new(404).with_header("x-bar", "y-foo");
    assert!(assertion.test(&resp).is_err());
}

#[test]
fn header_name_is_case_insensitive() {
    let assertion = assert_from(json!([{"header": "content-type", "is": "text/html"}]));
    let resp = Response::new(200).with_header("Content-Type", "text/html");
    assert!(assertion.test(&resp).is_ok());
}

#[test]
fn header_is() {
    let assertion = assert_from(json!([{"header": "Content-Type", "is": "text/html"}]));
    let resp = Response::new(200).with_header("Content-Type", "text/html");
    assert!(assertion.test(&resp).is_ok());
    let resp = Response::new(200).with_header("Content-Type", "text/plain");
    let err = assertion.test(&resp).unwrap_err();
    assert_eq!(err.kind, RuleKind::Header);
    assert_eq!(err.actual, "'text/plain'");
}

#[test]
fn header_contains() {
    let assertion = assert_from(json!([{"header": "Content-Type", "contains": "xml"}]));
    let resp = Response::new(200).with_header("Content-Type", "application/xml+xhtml");
    assert!(assertion.test(&resp).is_ok());
    let resp = Response::new(200).with_header("Content-Type", "text/html");
    assert!(assertion.test(&resp).is_err());
}

#[test]
fn body_text_present() {
    let assertion = assert_from(json!([{"body": "text"}]));
    assert!(assertion.test(&Response::new(200).with_text("Sample")).is_ok());
    let err = assertion.test(&Response::new(200)).unwrap_err();
    assert_eq!(err.kind, RuleKind::Body);
}

#[test]
fn body_text_is() {
    let assertion = assert_from(json!([{"body": "text", "is": "sample"}]));
    assert!(assertion.test(&Response::new(200).with_text("sample")).is_ok());
    assert!(assertion.test(&Response::new(200).with_text("other")).is_err());
}

#[test]
fn body_text_contains() {
    let assertion = assert_from(json!([{"body": "text", "contains": "llo wo"}]));
    assert!(assertion.test(&Response::new(200).with_text("hello world")).is_ok());
    assert!(assertion.test(&Response::new(200).with_text("ehlo world")).is_err());
}

#[test]
fn declared_rules_replace_the_default() {
    // A 404 passes once the rules say so.
    let assertion = assert_from(json!([{"status": "404"}]));
    assert!(assertion.test(&Response::new(404)).is_ok());
}

#[test]
fn rules_run_in_order_and_stop_at_first_failure() {
    let assertion = assert_from(json!([
        {"status": "2xx"},
        {"header": "X-First"},
        {"header": "X-Second"}
    ]));
    let resp = Response::new(200).with_header("X-Second", "1");
    let err = assertion.test(&resp).unwrap_err();
    assert_eq!(err.index, Some(1));
    assert!(err.expected.contains("X-First"));
}

#[test]
fn malformed_status_is_invalid_rule() {
    let err = Assert::from_specs(&[json!({"status": "4x"})]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidRule);
    assert_eq!(err.path.as_deref(), Some("assert[0].status"));
}

#[test]
fn failure_display_is_readable() {
    let assertion = assert_from(json!([{"status": "4xx"}]));
    let err = assertion.test(&Response::new(501)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "rule #1 (status): unexpected status: expected 4xx, got 501"
    );
}
