// Quill web server
//
// Serves the embedded UI and the generation API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use quill_core::llm::resolve_api_key;
use quill_core::{
    GenerationRequest, GraphBuilder, GroqClient, GroqClientConfig, QuillError, SessionStore,
    UseCase, DEFAULT_MODEL, SUPPORTED_MODELS,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::WebConfig;
use crate::static_assets;

const SESSION_COOKIE: &str = "quill_session";

/// Web server state
#[derive(Clone)]
struct WebState {
    sessions: Arc<SessionStore>,
    llm_template: GroqClientConfig,
}

/// Quill HTTP server
pub struct WebServer {
    config: WebConfig,
    sessions: Arc<SessionStore>,
}

impl WebServer {
    pub fn new(config: WebConfig) -> Self {
        Self {
            config,
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Start the web server
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        info!(
            target: "quill_web",
            addr = %addr,
            "Starting Quill web server"
        );

        let state = WebState {
            sessions: self.sessions,
            llm_template: self.config.llm.clone(),
        };
        let app = router(state);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(
            target: "quill_web",
            url = %format!("http://{}", addr),
            "Quill web server ready"
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}

fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/static/*asset", get(static_asset_handler))
        .route("/api/models", get(models_handler))
        .route("/api/session", get(session_handler))
        .route("/api/generate", post(generate_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the main HTML page
async fn index_handler() -> Html<&'static str> {
    Html(static_assets::INDEX_HTML)
}

async fn static_asset_handler(Path(asset): Path<String>) -> impl IntoResponse {
    match static_assets::get(asset.as_str()) {
        Some(asset) => {
            let mut headers = HeaderMap::new();
            if let Ok(value) = header::HeaderValue::from_str(asset.content_type) {
                headers.insert(header::CONTENT_TYPE, value);
            }
            (StatusCode::OK, headers, asset.body).into_response()
        }
        None => {
            let headers = HeaderMap::new();
            (StatusCode::NOT_FOUND, headers, b"Not found".as_slice()).into_response()
        }
    }
}

/// The static model list offered for selection
async fn models_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "models": SUPPORTED_MODELS,
        "default": DEFAULT_MODEL,
    }))
}

/// Current state of the caller's session
async fn session_handler(State(state): State<WebState>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = session_id_from(&headers);
    let body = Json(state.sessions.state(&session_id)).into_response();
    with_session_cookie(body, &session_id, is_new)
}

/// Generation request body
#[derive(Debug, Deserialize)]
struct GenerateParams {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default = "default_model")]
    model: String,
    topic: String,
    #[serde(default = "default_language")]
    language: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_language() -> String {
    "english".to_string()
}

/// Run one generation for the caller's session
async fn generate_handler(
    State(state): State<WebState>,
    headers: HeaderMap,
    Json(params): Json<GenerateParams>,
) -> Response {
    let (session_id, is_new) = session_id_from(&headers);
    let (use_case, request) = build_request(&params.topic, &params.language);

    if let Err(e) = request.validate(use_case) {
        let resp = error_response(&e);
        return with_session_cookie(resp, &session_id, is_new);
    }

    state.sessions.begin(&session_id);

    // Initialization guard: credential or client construction failures are
    // surfaced inline and leave the session Idle.
    let client = match build_client(&state.llm_template, &params.model, params.api_key.as_deref())
    {
        Ok(c) => c,
        Err(e) => {
            warn!(target: "quill_web", error = %e, "Client construction failed");
            state.sessions.fail(&session_id);
            let resp = error_response(&e);
            return with_session_cookie(resp, &session_id, is_new);
        }
    };

    let pipeline = GraphBuilder::new(Arc::new(client)).setup_graph(use_case);
    let resp = match pipeline.invoke(&request).await {
        Ok(result) => {
            state.sessions.finish(&session_id, result.clone());
            Json(serde_json::json!({
                "state": "rendered",
                "result": result,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(target: "quill_web", error = %e, "Generation failed");
            state.sessions.fail(&session_id);
            error_response(&e)
        }
    };
    with_session_cookie(resp, &session_id, is_new)
}

/// Map the UI language selection to a use-case and a typed request.
///
/// English uses the plain topic graph; any other language adds the
/// lowercased target language and uses the translating graph.
fn build_request(topic: &str, language: &str) -> (UseCase, GenerationRequest) {
    let language = language.to_lowercase();
    if language == "english" {
        (UseCase::Topic, GenerationRequest::for_topic(topic))
    } else {
        (
            UseCase::Language,
            GenerationRequest::for_language(topic, language),
        )
    }
}

/// Per-request client: the configured template plus the caller's model and
/// credential
fn build_client(
    template: &GroqClientConfig,
    model: &str,
    api_key: Option<&str>,
) -> quill_core::Result<GroqClient> {
    let mut cfg = template.clone();
    cfg.model = model.to_string();
    cfg.api_key = Some(resolve_api_key(api_key)?);
    GroqClient::new(cfg)
}

fn status_for(err: &QuillError) -> StatusCode {
    match err {
        QuillError::CredentialError(_) => StatusCode::UNAUTHORIZED,
        QuillError::InvalidRequestError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuillError::ProviderError(_) | QuillError::ShapeMismatchError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &QuillError) -> Response {
    (
        status_for(err),
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Session id from the request cookie, or a fresh one
fn session_id_from(headers: &HeaderMap) -> (String, bool) {
    if let Some(cookie) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for part in cookie.split(';') {
            if let Some((name, value)) = part.trim().split_once('=') {
                if name == SESSION_COOKIE && !value.is_empty() {
                    return (value.to_string(), false);
                }
            }
        }
    }
    (Uuid::new_v4().to_string(), true)
}

fn with_session_cookie(mut resp: Response, session_id: &str, is_new: bool) -> Response {
    if is_new {
        let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = header::HeaderValue::from_str(&cookie) {
            resp.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_selects_topic_use_case() {
        let (use_case, request) = build_request("AI Agents", "english");
        assert_eq!(use_case, UseCase::Topic);
        assert_eq!(request, GenerationRequest::for_topic("AI Agents"));
        assert!(request.validate(use_case).is_ok());
    }

    #[test]
    fn other_languages_select_language_use_case() {
        for lang in ["hindi", "french", "Hindi"] {
            let (use_case, request) = build_request("AI Agents", lang);
            assert_eq!(use_case, UseCase::Language);
            assert_eq!(
                request.current_language.as_deref(),
                Some(lang.to_lowercase().as_str())
            );
            assert!(request.validate(use_case).is_ok());
        }
    }

    #[test]
    fn empty_topic_is_rejected_before_any_client_is_built() {
        let (use_case, request) = build_request("", "english");
        assert!(matches!(
            request.validate(use_case),
            Err(QuillError::InvalidRequestError(_))
        ));
    }

    #[test]
    fn error_statuses_follow_the_taxonomy() {
        assert_eq!(
            status_for(&QuillError::CredentialError("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&QuillError::InvalidRequestError("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&QuillError::ProviderError("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&QuillError::ShapeMismatchError("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&QuillError::ClientConstructionError("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn session_cookie_is_parsed_and_minted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            header::HeaderValue::from_static("other=1; quill_session=abc-123"),
        );
        let (id, is_new) = session_id_from(&headers);
        assert_eq!(id, "abc-123");
        assert!(!is_new);

        let (id, is_new) = session_id_from(&HeaderMap::new());
        assert!(!id.is_empty());
        assert!(is_new);
    }

    #[test]
    fn generate_params_default_model_and_language() {
        let params: GenerateParams =
            serde_json::from_str(r#"{"topic": "AI Agents"}"#).unwrap();
        assert_eq!(params.model, DEFAULT_MODEL);
        assert_eq!(params.language, "english");
        assert_eq!(params.api_key, None);
    }
}
