use super::common::test_data;
use restspec::error::{LoadError, ParseErrorKind};
use restspec::loader::{discover, load, load_str, load_with};
use restspec::options::LoadOptions;
use restspec::types::RequestBody;
use serde_json::json;

#[test]
fn missing_file_is_not_found() {
    let err = load(test_data("unexistant_file.yml")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)), "{err:?}");
}

#[test]
fn empty_file_has_no_sessions() {
    let sessions = load(test_data("empty.yml")).expect("empty file loads");
    assert!(sessions.is_empty());
}

#[test]
fn bad_file_is_a_syntax_error() {
    let err = load(test_data("broken/bad.yml")).unwrap_err();
    match err {
        LoadError::Syntax(e) => assert_eq!(e.file, Some(test_data("broken/bad.yml"))),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn valid_file_has_one_session() {
    let sessions = load(test_data("simple.yml")).expect("simple file loads");
    assert_eq!(sessions.len(), 1);

    let session = &sessions[0];
    assert_eq!(session.title(), Some("Simple scenario"));
    assert_eq!(session.base_uri(), Some("http://httpbin.org"));
    assert_eq!(session.len(), 2);
    assert_eq!(session.resources()[0].request().url, "/get");
    assert_eq!(session.resources()[0].asserts().len(), 2);
    assert_eq!(session.resources()[1].request().url, "/status/404");
}

#[test]
fn empty_action_list_has_no_sessions() {
    let sessions = load(test_data("empty-actions.yml")).unwrap();
    assert!(sessions.is_empty());
}

#[test]
fn missing_action_list_has_no_sessions() {
    let sessions = load(test_data("missing-actions.yml")).unwrap();
    assert!(sessions.is_empty());
}

#[test]
fn actions_with_requests_is_a_parse_error() {
    let err = load(test_data("broken/actions-with-requests.yml")).unwrap_err();
    match err {
        LoadError::Parse { error, .. } => assert_eq!(error.kind, ParseErrorKind::ActionsConflict),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn directory_aggregates_sessions_in_file_order() {
    let sessions = load(test_data("")).expect("test-data loads");
    assert_eq!(sessions.len(), 3);
    let titles: Vec<_> = sessions.iter().map(|s| s.title()).collect();
    assert_eq!(titles, [Some("users"), Some("static"), Some("Simple scenario")]);
}

#[test]
fn discovery_skips_subdirectories() {
    let files = discover(&test_data("")).unwrap();
    assert!(files.iter().all(|f| !f.starts_with(test_data("broken"))));
    assert!(files.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(files.len(), 5);
}

#[test]
fn missing_directory_is_not_found() {
    let err = load(test_data("missing-dir")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
}

#[test]
fn bad_document_fails_the_whole_directory() {
    let err = load(test_data("broken")).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "{err:?}");
}

#[test]
fn syntax_error_fails_a_directory_with_valid_neighbours() {
    assert_eq!(load(test_data("syntax/valid.yml")).unwrap().len(), 1);

    match load(test_data("syntax")).unwrap_err() {
        LoadError::Syntax(e) => assert_eq!(e.file, Some(test_data("syntax/bad.yml"))),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn empty_request_fields_declare_nothing() {
    let sessions = load(test_data("fields/empty-fields.yml")).unwrap();
    let session = &sessions[0];
    assert!(session.headers().is_empty());

    let resolved = session
        .resolve(&session.resources()[0], session.context(), &Default::default())
        .expect("empty fields resolve");
    assert_eq!(resolved.request.url, "http://h/x");
    assert!(resolved.request.headers.is_empty());
    assert!(resolved.request.query.is_empty());
    assert_eq!(resolved.request.body, RequestBody::Empty);
}

#[test]
fn outer_context_reaches_session_templates() {
    let yaml = "baseUri: 'https://{{host}}'\nactions: [/]\n";
    let options = LoadOptions::with_context(json!({"host": "api.test"}));
    let sessions = load_str(yaml, &options).unwrap();
    assert_eq!(sessions[0].base_uri(), Some("https://api.test"));
}

#[test]
fn session_vars_shadow_outer_context() {
    let options = LoadOptions::with_context(json!({"server": "outer.test", "extra": 1}));
    let sessions = load_with(test_data("simple.yml"), &options).unwrap();
    assert_eq!(sessions[0].base_uri(), Some("http://httpbin.org"));
    assert_eq!(sessions[0].context()["extra"], json!(1));
}

#[test]
fn unresolvable_base_uri_is_a_template_error() {
    let err = load_str("baseUri: '{{host}}'\nactions: [/]\n", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Template { .. }));
}
