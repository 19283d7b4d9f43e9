use crate::llm::registry::DEFAULT_MODEL;
use crate::{QuillError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

/// Configuration for GroqClient loaded from environment variables
#[derive(Debug, Clone)]
pub struct GroqClientConfig {
    pub base_url: String, // e.g., https://api.groq.com/openai/v1
    pub model: String,    // e.g., llama-3.1-8b-instant
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
    pub temperature: f32,
}

impl Default for GroqClientConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("GROQ_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://api.groq.com/openai/v1".to_string()),
            model: std::env::var("GROQ_MODEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: std::env::var("GROQ_API_KEY").ok().filter(|s| !s.is_empty()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30_000),
            temperature: std::env::var("GROQ_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(0.7),
        }
    }
}

/// Resolve the API key to use for a client or a live model listing.
///
/// An explicit non-empty value wins; otherwise `GROQ_API_KEY` from the
/// environment; otherwise `CredentialError`. No network call is made.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }
    std::env::var("GROQ_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            QuillError::CredentialError(
                "no Groq API key supplied and GROQ_API_KEY is not set".to_string(),
            )
        })
}

/// A single chat message in the OpenAI-compatible wire format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat backend seam used by the generation pipeline
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one chat exchange and return the assistant text
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Identifier of the bound model
    fn model(&self) -> &str;
}

/// HTTP client bound to (provider, model, credential)
///
/// Construction performs no network call; the credential must be resolvable
/// or construction fails with `CredentialError`.
#[derive(Debug, Clone)]
pub struct GroqClient {
    http: Client,
    cfg: GroqClientConfig,
}

impl GroqClient {
    pub fn new(cfg: GroqClientConfig) -> Result<Self> {
        if cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .is_none()
        {
            return Err(QuillError::CredentialError(
                "cannot construct a Groq client without an API key".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| {
                QuillError::ClientConstructionError(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { http, cfg })
    }

    /// Factory entry point: default config, the caller's model, and a
    /// resolved credential (explicit value or `GROQ_API_KEY`).
    pub fn create(model: &str, api_key: Option<&str>) -> Result<Self> {
        let mut cfg = GroqClientConfig::default();
        cfg.model = model.to_string();
        cfg.api_key = Some(resolve_api_key(api_key)?);
        Self::new(cfg)
    }

    pub fn config(&self) -> &GroqClientConfig {
        &self.cfg
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let chat_url = format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );
        debug!(
            target = "groq_client",
            model = %self.cfg.model,
            "POST {} via Chat Completions", chat_url
        );

        let mut req = self
            .http
            .post(&chat_url)
            .header("content-type", "application/json");
        if let Some(key) = &self.cfg.api_key {
            req = req.bearer_auth(key);
        }

        let body = json!({
            "model": self.cfg.model,
            "messages": messages,
            "temperature": self.cfg.temperature,
        });

        let resp = req
            .json(&body)
            .send()
            .await
            .map_err(|e| QuillError::ProviderError(format!("Chat Completions HTTP error: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            error!(target = "groq_client", %status, body = %text, "Chat Completions error");
            return Err(QuillError::ProviderError(format!(
                "Chat Completions error: status={} body={}",
                status, text
            )));
        }

        let val: serde_json::Value = resp.json().await.map_err(|e| {
            QuillError::ProviderError(format!("failed to parse Chat Completions JSON: {e}"))
        })?;
        extract_text_from_chat_completions(&val).ok_or_else(|| {
            QuillError::ProviderError(
                "missing choices[0].message.content in chat completions".to_string(),
            )
        })
    }

    fn model(&self) -> &str {
        &self.cfg.model
    }
}

fn extract_text_from_chat_completions(v: &serde_json::Value) -> Option<String> {
    v.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| s.to_string())
}
