use restspec::error::{ParseErrorKind, SessionError};
use restspec::options::TemplateOptions;
use restspec::session::Session;
use restspec::types::RequestBody;
use serde_json::json;

#[test]
fn builds_resources_in_declaration_order() {
    let spec = json!({
        "title": "ordered",
        "actions": ["/one", {"post": "/two"}, {"method": "put", "url": "/three"}],
    });
    let session = Session::new(&spec, &json!({}), &TemplateOptions::default()).unwrap();
    let urls: Vec<&str> = session.resources().iter().map(|r| r.request().url.as_str()).collect();
    assert_eq!(urls, ["/one", "/two", "/three"]);
}

#[test]
fn conflicting_action_lists_fail() {
    let spec = json!({"actions": ["/a"], "requests": ["/b"]});
    let err = Session::new(&spec, &json!({}), &TemplateOptions::default()).unwrap_err();
    match err {
        SessionError::Parse(e) => assert_eq!(e.kind, ParseErrorKind::ActionsConflict),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn non_mapping_vars_are_rejected() {
    let spec = json!({"vars": ["a"], "actions": ["/"]});
    let err = Session::new(&spec, &json!({}), &TemplateOptions::default()).unwrap_err();
    match err {
        SessionError::Parse(e) => {
            assert_eq!(e.kind, ParseErrorKind::TypeMismatch);
            assert_eq!(e.path.as_deref(), Some("vars"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn resolve_uses_merged_context_and_session_base() {
    let spec = json!({
        "baseUri": "http://{{host}}/v1",
        "headers": {"X-Client": "{{client}}"},
        "vars": {"client": "restspec"},
        "actions": [{
            "post": "/items",
            "headers": {"X-Trace": "{{trace}}"},
            "body": "id={{id}}",
            "assert": [{"status": "201"}],
        }],
    });
    let outer = json!({"host": "api.test", "trace": "t-1", "id": 42});
    let session = Session::new(&spec, &outer, &TemplateOptions::default()).unwrap();

    let resource = &session.resources()[0];
    let resolved = session
        .resolve(resource, session.context(), &TemplateOptions::default())
        .unwrap();
    assert_eq!(resolved.request.url, "http://api.test/v1/items");
    assert_eq!(resolved.request.header("x-client"), Some("restspec"));
    assert_eq!(resolved.request.header("x-trace"), Some("t-1"));
    assert_eq!(resolved.request.body, RequestBody::Text("id=42".to_string()));
    assert_eq!(resolved.asserts.rules().len(), 1);
}

#[test]
fn resolve_accepts_an_extended_context() {
    let spec = json!({"actions": ["/users/{{user_id}}"]});
    let session = Session::new(&spec, &json!({}), &TemplateOptions::default()).unwrap();
    let resource = &session.resources()[0];

    assert!(session.resolve(resource, session.context(), &TemplateOptions::default()).is_err());

    let extended = restspec::vars::merge_vars(
        session.context(),
        json!({"user_id": 9}).as_object().unwrap(),
    );
    let resolved = session
        .resolve(resource, &extended, &TemplateOptions::default())
        .unwrap();
    assert_eq!(resolved.request.url, "/users/9");
}

#[test]
fn resource_errors_use_the_declared_list_key() {
    let spec = json!({"requests": ["/ok", {"method": "fetch", "url": "/"}]});
    let err = Session::new(&spec, &json!({}), &TemplateOptions::default()).unwrap_err();
    match err {
        SessionError::Parse(e) => {
            assert_eq!(e.kind, ParseErrorKind::InvalidMethod);
            assert_eq!(e.path.as_deref(), Some("requests[1].method"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}
