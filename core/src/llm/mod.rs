//! LLM module: HTTP client, credential resolution, and model registry
//!
//! This module provides:
//! - `GroqClientConfig`, `GroqClient` for talking to the Groq
//!   OpenAI-compatible chat-completions endpoint
//! - `ChatModel` trait so the pipeline can be driven by any chat backend
//! - `ModelRegistry` with the static model list and the live `/models` query

mod client;
mod registry;

pub use client::{resolve_api_key, ChatMessage, ChatModel, GroqClient, GroqClientConfig};
pub use registry::{is_supported, ModelRegistry, DEFAULT_MODEL, SUPPORTED_MODELS};
