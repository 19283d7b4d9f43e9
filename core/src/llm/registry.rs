use crate::llm::client::resolve_api_key;
use crate::{QuillError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Models offered for selection, in presentation order.
///
/// The static list and the provider's live list are not guaranteed to be
/// identical; the UI uses the static list only.
pub const SUPPORTED_MODELS: [&str; 7] = [
    "llama-3.3-70b-versatile",
    "groq/compound-mini",
    "llama-3.1-8b-instant",
    "qwen/qwen3-32b",
    "openai/gpt-oss-120b",
    "openai/gpt-oss-20b",
    "meta-llama/llama-guard-4-12b",
];

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

pub fn is_supported(model: &str) -> bool {
    SUPPORTED_MODELS.contains(&model)
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Live model listing against the provider's `/models` endpoint
pub struct ModelRegistry {
    http: Client,
    base_url: String,
}

impl ModelRegistry {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(10_000))
            .build()
            .map_err(|e| {
                QuillError::ClientConstructionError(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn groq() -> Result<Self> {
        Self::new(
            std::env::var("GROQ_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://api.groq.com/openai/v1".to_string()),
        )
    }

    /// Query the provider for the models associated with the credential.
    ///
    /// Fails with `CredentialError` before any request is made when no key
    /// is resolvable, and with `ProviderError` when the remote call fails.
    pub async fn list_live(&self, api_key: Option<&str>) -> Result<Vec<String>> {
        let key = resolve_api_key(api_key)?;
        let url = format!("{}/models", self.base_url.trim_end_matches('/'));
        debug!(target = "model_registry", "GET {}", url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&key)
            .send()
            .await
            .map_err(|e| QuillError::ProviderError(format!("model listing HTTP error: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(QuillError::ProviderError(format!(
                "model listing error: status={} body={}",
                status, text
            )));
        }

        let list: ModelList = resp
            .json()
            .await
            .map_err(|e| QuillError::ProviderError(format!("failed to parse model list: {e}")))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}
