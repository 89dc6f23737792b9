use restspec::error::ParseErrorKind;
use restspec::normalize::{expand_action, get_actions};
use restspec::enums::Method;
use serde_json::json;

#[test]
fn url_only_defaults_method_to_get() {
    let spec = json!({"url": "/some/url", "headers": {}});
    let expanded = expand_action(&spec).expect("url-only spec expands");
    assert_eq!(
        expanded.to_value(),
        json!({"method": "get", "url": "/some/url", "headers": {}})
    );
}

#[test]
fn verb_shorthand_becomes_method_and_url() {
    let spec = json!({"put": "/url", "json": [1, 2]});
    let expanded = expand_action(&spec).expect("shorthand expands");
    assert_eq!(
        expanded.to_value(),
        json!({"method": "put", "url": "/url", "json": [1, 2]})
    );
}

#[test]
fn every_verb_is_a_shorthand() {
    for method in Method::ALL {
        let mut spec = serde_json::Map::new();
        spec.insert(method.as_str().to_string(), json!("/x"));
        let expanded = expand_action(&spec.into()).expect("shorthand expands");
        assert_eq!(expanded.request.method, method);
        assert_eq!(expanded.request.url, "/x");
    }
}

#[test]
fn already_expanded_spec_is_unchanged() {
    let spec = json!({"url": "/url", "method": "delete"});
    let expanded = expand_action(&spec).expect("explicit spec expands");
    assert_eq!(expanded.to_value(), spec);
}

#[test]
fn spec_without_url_is_rejected() {
    let err = expand_action(&json!({"headers": {}, "body": ""})).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingUrl);
}

#[test]
fn method_without_url_is_rejected() {
    let err = expand_action(&json!({"method": "options"})).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingUrl);
}

#[test]
fn unknown_method_is_rejected() {
    let err = expand_action(&json!({"url": "/url", "method": "bad_method"})).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidMethod);
}

#[test]
fn assert_and_expect_together_conflict() {
    let spec = json!({
        "url": "/",
        "expect": [{"status": "4xx"}],
        "assert": [{"header": "Content-Type"}],
    });
    let err = expand_action(&spec).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::AssertionConflict);
}

#[test]
fn assertion_conflict_wins_over_missing_url() {
    let err = expand_action(&json!({"expect": [], "assert": []})).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::AssertionConflict);
}

#[test]
fn assert_rules_are_kept() {
    let spec = json!({"url": "/url", "assert": [{"status": "200"}]});
    let expanded = expand_action(&spec).unwrap();
    assert_eq!(
        expanded.to_value(),
        json!({"url": "/url", "method": "get", "assert": [{"status": "200"}]})
    );
}

#[test]
fn expect_is_renamed_to_assert() {
    let spec = json!({"url": "/url", "expect": [{"status": "500"}]});
    let expanded = expand_action(&spec).unwrap();
    assert_eq!(
        expanded.to_value(),
        json!({"url": "/url", "method": "get", "assert": [{"status": "500"}]})
    );
    assert!(!expanded.request.fields.contains_key("expect"));
}

#[test]
fn bare_string_is_a_get() {
    let expanded = expand_action(&json!("http://example.com/")).unwrap();
    assert_eq!(
        expanded.to_value(),
        json!({"method": "get", "url": "http://example.com/"})
    );
}

#[test]
fn input_is_not_modified() {
    let spec = json!({"post": "/x", "expect": [{"status": "201"}]});
    let before = spec.clone();
    let _ = expand_action(&spec).unwrap();
    assert_eq!(spec, before);
}

#[test]
fn remaining_fields_keep_their_order() {
    let spec = json!({"zeta": 1, "get": "/", "alpha": 2, "mid": 3});
    let expanded = expand_action(&spec).unwrap();
    let keys: Vec<&str> = expanded.request.fields.keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

#[test]
fn actions_and_requests_together_conflict() {
    let err = get_actions(&json!({"actions": [], "requests": []})).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::ActionsConflict);
}

#[test]
fn actions_and_requests_are_aliases() {
    let spec = json!({"actions": [{"url": "/sample"}]});
    let alt_spec = json!({"requests": [{"url": "/sample"}]});
    let actions = get_actions(&spec).unwrap();
    let requests = get_actions(&alt_spec).unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions, requests);
}

#[test]
fn missing_action_list_is_empty() {
    assert!(get_actions(&json!({"title": "x"})).unwrap().is_empty());
    assert!(get_actions(&json!({"actions": []})).unwrap().is_empty());
}
