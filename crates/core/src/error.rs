//! Error types for the promptloom domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all promptloom operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Template errors ---
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    // --- Tokenizer errors ---
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    // --- Compiler errors ---
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Configuration and input-shape errors. Fatal, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Template {0} does not exist")]
    NotFound(String),

    #[error("Unexpected role: {0}")]
    UnexpectedRole(String),

    #[error("Dialogue must contain prompt/response pairs, got {0} turns")]
    OddTurnCount(usize),

    #[error("Dialogue is empty")]
    EmptyDialogue,

    #[error("Stop words are required to replace the EOS token (template: {0})")]
    MissingStopWords(String),

    #[error("Invalid formatter: {0}")]
    InvalidFormatter(String),
}

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("Failed to load tokenizer from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Chat template rejected: {0}")]
    ChatTemplate(String),
}

/// Failures of the declarative compiler. Recoverable: callers fall back to
/// not installing a compiled template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Unsupported slot in {role} formatter: {reason}")]
    Unsupported { role: String, reason: String },
}
