//! Generation pipeline: the graph the web layer drives
//!
//! `GraphBuilder` binds a chat backend to one of two use-cases and yields a
//! `ConfiguredPipeline`. `invoke_raw` returns the legacy use-case-shaped
//! payload (flat `{title, content}` for topic runs, nested under `"blog"`
//! for language runs); `invoke` collapses both shapes into one typed result
//! so nothing above this module has to branch on the use-case.

mod nodes;

use crate::llm::ChatModel;
use crate::{QuillError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Which graph the pipeline was configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseCase {
    /// Generate a blog for a topic in English
    Topic,
    /// Generate a blog for a topic, then translate it
    Language,
}

impl UseCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            UseCase::Topic => "topic",
            UseCase::Language => "language",
        }
    }
}

/// Typed generation request
///
/// Invariant: `current_language` is present if and only if the use-case is
/// `language`, and the value is lowercase. Checked by `validate` before any
/// network call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_language: Option<String>,
}

impl GenerationRequest {
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            current_language: None,
        }
    }

    pub fn for_language(topic: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            current_language: Some(language.into().to_lowercase()),
        }
    }

    pub fn validate(&self, use_case: UseCase) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(QuillError::InvalidRequestError(
                "topic must not be empty".to_string(),
            ));
        }
        match (use_case, &self.current_language) {
            (UseCase::Topic, Some(_)) => Err(QuillError::InvalidRequestError(
                "current_language is not allowed for the topic use-case".to_string(),
            )),
            (UseCase::Language, None) => Err(QuillError::InvalidRequestError(
                "current_language is required for the language use-case".to_string(),
            )),
            (UseCase::Language, Some(lang)) if lang.trim().is_empty() => Err(
                QuillError::InvalidRequestError("current_language must not be empty".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// The one result shape the rest of the system sees
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationResult {
    pub title: String,
    pub content: String,
}

impl GenerationResult {
    /// Collapse a raw use-case-shaped payload into the normalized result.
    ///
    /// Topic payloads are flat; a missing key there is a hard
    /// `ShapeMismatchError`. Language payloads nest the blog under `"blog"`;
    /// an absent or incomplete `blog` is tolerated as `Ok(None)` (the UI
    /// renders nothing for it).
    pub fn from_raw(use_case: UseCase, raw: &Value) -> Result<Option<GenerationResult>> {
        match use_case {
            UseCase::Topic => Ok(Some(read_flat(raw)?)),
            UseCase::Language => match raw.get("blog") {
                None | Some(Value::Null) => Ok(None),
                Some(blog) => Ok(read_flat(blog).ok()),
            },
        }
    }
}

fn read_flat(v: &Value) -> Result<GenerationResult> {
    let title = v
        .get("title")
        .and_then(|t| t.as_str())
        .ok_or_else(|| QuillError::ShapeMismatchError("missing title".to_string()))?;
    let content = v
        .get("content")
        .and_then(|c| c.as_str())
        .ok_or_else(|| QuillError::ShapeMismatchError("missing content".to_string()))?;
    Ok(GenerationResult {
        title: title.to_string(),
        content: content.to_string(),
    })
}

/// Builds a generation graph around a chat backend
pub struct GraphBuilder {
    llm: Arc<dyn ChatModel>,
}

impl GraphBuilder {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Configure the graph for one of the two supported use-cases
    pub fn setup_graph(self, use_case: UseCase) -> ConfiguredPipeline {
        ConfiguredPipeline {
            llm: self.llm,
            use_case,
        }
    }
}

/// A graph bound to a chat backend and a use-case
pub struct ConfiguredPipeline {
    llm: Arc<dyn ChatModel>,
    use_case: UseCase,
}

impl ConfiguredPipeline {
    pub fn use_case(&self) -> UseCase {
        self.use_case
    }

    /// Run the graph and return the legacy use-case-shaped payload.
    ///
    /// Topic runs return a flat `{title, content}` object; language runs
    /// return `{"blog": {title, content}}`. Blocks for the duration of the
    /// remote generation calls.
    pub async fn invoke_raw(&self, request: &GenerationRequest) -> Result<Value> {
        request.validate(self.use_case)?;
        info!(
            target = "pipeline",
            use_case = self.use_case.as_str(),
            model = self.llm.model(),
            topic = %request.topic,
            "Invoking generation graph"
        );

        let title = nodes::title(self.llm.as_ref(), &request.topic).await?;
        let content = nodes::content(self.llm.as_ref(), &request.topic, &title).await?;

        match self.use_case {
            UseCase::Topic => Ok(json!({ "title": title, "content": content })),
            UseCase::Language => {
                // validate() guarantees the language is present here
                let language = request
                    .current_language
                    .as_deref()
                    .ok_or_else(|| {
                        QuillError::InvalidRequestError(
                            "current_language is required for the language use-case".to_string(),
                        )
                    })?;
                let title = nodes::translate(self.llm.as_ref(), language, &title).await?;
                let content = nodes::translate(self.llm.as_ref(), language, &content).await?;
                Ok(json!({ "blog": { "title": title, "content": content } }))
            }
        }
    }

    /// Run the graph and normalize the payload into one typed shape.
    ///
    /// `Ok(None)` is the tolerated absent-`blog` case on the language path.
    pub async fn invoke(&self, request: &GenerationRequest) -> Result<Option<GenerationResult>> {
        let raw = self.invoke_raw(request).await?;
        GenerationResult::from_raw(self.use_case, &raw)
    }
}
