use quill_core::llm::{is_supported, ModelRegistry, DEFAULT_MODEL, SUPPORTED_MODELS};
use quill_core::QuillError;
use serial_test::serial;

#[test]
fn static_list_is_fixed_and_ordered() {
    assert_eq!(SUPPORTED_MODELS.len(), 7);
    assert_eq!(SUPPORTED_MODELS[0], "llama-3.3-70b-versatile");
    assert_eq!(SUPPORTED_MODELS[2], "llama-3.1-8b-instant");
    assert!(SUPPORTED_MODELS.contains(&DEFAULT_MODEL));
}

#[test]
fn membership_check_matches_the_static_list() {
    assert!(is_supported("llama-3.1-8b-instant"));
    assert!(is_supported("meta-llama/llama-guard-4-12b"));
    assert!(!is_supported("gpt-4o"));
    assert!(!is_supported(""));
}

#[tokio::test]
async fn live_list_returns_provider_model_ids() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "object": "list",
                "data": [
                    {"id": "llama-3.1-8b-instant", "object": "model"},
                    {"id": "whisper-large-v3", "object": "model"},
                ],
            })
            .to_string(),
        )
        .create_async()
        .await;

    let registry = ModelRegistry::new(server.url()).unwrap();
    let models = registry.list_live(Some("test-key")).await.unwrap();
    assert_eq!(models, vec!["llama-3.1-8b-instant", "whisper-large-v3"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn live_list_maps_remote_failure_to_provider_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let registry = ModelRegistry::new(server.url()).unwrap();
    let err = registry.list_live(Some("test-key")).await.unwrap_err();
    assert!(matches!(err, QuillError::ProviderError(_)));
}

#[tokio::test]
#[serial]
async fn live_list_requires_a_credential() {
    std::env::remove_var("GROQ_API_KEY");

    let registry = ModelRegistry::new("http://localhost:1/v1").unwrap();
    let err = registry.list_live(None).await.unwrap_err();
    // Fails before any request is made
    assert!(matches!(err, QuillError::CredentialError(_)));
}
