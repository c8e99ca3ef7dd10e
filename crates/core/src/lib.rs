//! # promptloom Core
//!
//! Domain types, the tokenizer contract, and error definitions shared by
//! the promptloom crates. The template engine in `promptloom-template`
//! is written against these types only; concrete tokenizers plug in
//! through the [`Tokenizer`] trait.

pub mod error;
pub mod message;
pub mod tokenizer;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{CompileError, Error, Result, TemplateError, TokenizerError};
pub use message::{Role, Turn};
pub use tokenizer::{TokenId, Tokenizer};
pub use tool::{FunctionCall, ToolDefinition};

#[cfg(feature = "hf")]
pub use tokenizer::{HfTokenizer, SpecialTokens};
