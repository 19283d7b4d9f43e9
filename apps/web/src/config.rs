use std::fs;
use std::path::Path;

use quill_core::GroqClientConfig;

/// High-level configuration for the Quill web app
#[derive(Clone, Debug)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// Template for per-request Groq clients; model and key are filled in
    /// from the generation request.
    pub llm: GroqClientConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("QUILL_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("QUILL_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3030),
            llm: GroqClientConfig::default(),
        }
    }
}

impl WebConfig {
    /// Load configuration from a TOML file (path via QUILL_CONFIG or
    /// ./quill.toml), overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = std::env::var("QUILL_CONFIG").unwrap_or_else(|_| "quill.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target = "quill_web", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match toml::from_str::<WebToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target = "quill_web", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target = "quill_web", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct WebToml {
    pub server: Option<ServerToml>,
    pub llm: Option<LlmToml>,
}

impl WebToml {
    fn overlay(self, mut base: WebConfig) -> WebConfig {
        if let Some(s) = self.server {
            if let Some(h) = s.host {
                base.host = h;
            }
            if let Some(p) = s.port {
                base.port = p;
            }
        }
        if let Some(l) = self.llm {
            l.apply(&mut base.llm);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ServerToml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct LlmToml {
    pub base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub temperature: Option<f32>,
}

impl LlmToml {
    fn apply(self, l: &mut GroqClientConfig) {
        if let Some(x) = self.base_url {
            l.base_url = x;
        }
        if let Some(x) = self.request_timeout_ms {
            l.request_timeout_ms = x;
        }
        if let Some(x) = self.temperature {
            l.temperature = x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_without_env() {
        std::env::remove_var("QUILL_HOST");
        std::env::remove_var("QUILL_PORT");

        let cfg = WebConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 3030);
    }

    #[test]
    #[serial]
    fn env_overrides_defaults() {
        std::env::set_var("QUILL_HOST", "0.0.0.0");
        std::env::set_var("QUILL_PORT", "8088");

        let cfg = WebConfig::default();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8088);

        std::env::remove_var("QUILL_HOST");
        std::env::remove_var("QUILL_PORT");
    }

    #[test]
    #[serial]
    fn toml_overlay_applies_server_and_llm() {
        std::env::remove_var("QUILL_HOST");
        std::env::remove_var("QUILL_PORT");

        let t: WebToml = toml::from_str(
            r#"
            [server]
            port = 4000

            [llm]
            base_url = "http://localhost:9999/v1"
            temperature = 0.2
            "#,
        )
        .unwrap();
        let cfg = t.overlay(WebConfig::default());
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.llm.base_url, "http://localhost:9999/v1");
        assert_eq!(cfg.llm.temperature, 0.2);
    }
}
