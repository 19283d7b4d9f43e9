use quill_core::{GenerationResult, SessionState, SessionStore};

fn result(title: &str) -> GenerationResult {
    GenerationResult {
        title: title.to_string(),
        content: format!("{title} body"),
    }
}

#[test]
fn unknown_sessions_are_idle() {
    let store = SessionStore::new();
    assert_eq!(store.state("nobody"), SessionState::Idle);
    assert!(store.is_empty());
}

#[test]
fn generation_walks_idle_generating_rendered() {
    let store = SessionStore::new();

    store.begin("s1");
    assert_eq!(store.state("s1"), SessionState::Generating);

    store.finish("s1", Some(result("T")));
    assert_eq!(
        store.state("s1"),
        SessionState::Rendered {
            result: Some(result("T"))
        }
    );
}

#[test]
fn the_tolerated_empty_result_still_counts_as_rendered() {
    let store = SessionStore::new();
    store.begin("s1");
    store.finish("s1", None);
    assert_eq!(store.state("s1"), SessionState::Rendered { result: None });
}

#[test]
fn failed_invocations_return_the_session_to_idle() {
    let store = SessionStore::new();
    store.begin("s1");
    store.fail("s1");
    assert_eq!(store.state("s1"), SessionState::Idle);
}

#[test]
fn every_generation_overwrites_the_last_result() {
    let store = SessionStore::new();
    store.finish("s1", Some(result("first")));
    store.finish("s1", Some(result("second")));
    assert_eq!(
        store.state("s1"),
        SessionState::Rendered {
            result: Some(result("second"))
        }
    );

    // Identical inputs yield identical state
    store.finish("s1", Some(result("second")));
    assert_eq!(
        store.state("s1"),
        SessionState::Rendered {
            result: Some(result("second"))
        }
    );
}

#[test]
fn sessions_do_not_share_state() {
    let store = SessionStore::new();
    store.finish("s1", Some(result("T")));
    store.begin("s2");
    assert_eq!(
        store.state("s1"),
        SessionState::Rendered {
            result: Some(result("T"))
        }
    );
    assert_eq!(store.state("s2"), SessionState::Generating);
    assert_eq!(store.len(), 2);
}

#[test]
fn rendered_state_serializes_with_an_explicit_tag() {
    let state = SessionState::Rendered {
        result: Some(result("T")),
    };
    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(value["state"], "rendered");
    assert_eq!(value["result"]["title"], "T");

    let value = serde_json::to_value(SessionState::Idle).unwrap();
    assert_eq!(value["state"], "idle");
}
