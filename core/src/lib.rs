// Quill Core Library
// Blog generation engine over the Groq chat-completion API

pub mod llm;
pub mod pipeline;
pub mod session;

// Export core types
pub use llm::{
    ChatMessage, ChatModel, GroqClient, GroqClientConfig, ModelRegistry, DEFAULT_MODEL,
    SUPPORTED_MODELS,
};
pub use pipeline::{
    ConfiguredPipeline, GenerationRequest, GenerationResult, GraphBuilder, UseCase,
};
pub use session::{SessionState, SessionStore};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuillError {
    #[error("Credential error: {0}")]
    CredentialError(String),

    #[error("Client construction error: {0}")]
    ClientConstructionError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Result shape mismatch: {0}")]
    ShapeMismatchError(String),

    #[error("Invalid request: {0}")]
    InvalidRequestError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, QuillError>;
