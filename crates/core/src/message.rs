//! Dialogue domain types.
//!
//! A dialogue is an ordered list of turns. Turns are consumed in
//! prompt/response couples by the template encoder:
//! user (or observation) → assistant (or function call) → user → ...

use crate::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The role of a turn in a dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The model
    Assistant,
    /// System instructions
    System,
    /// A function call emitted by the model
    Function,
    /// A tool execution result fed back to the model
    #[serde(alias = "tool")]
    Observation,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Function => "function",
            Role::Observation => "observation",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            "function" => Ok(Role::Function),
            "observation" | "tool" => Ok(Role::Observation),
            other => Err(TemplateError::UnexpectedRole(other.to_string())),
        }
    }
}

/// A single turn in a dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a function-call turn. `content` is a `{"name", "arguments"}` JSON object.
    pub fn function(content: impl Into<String>) -> Self {
        Self::new(Role::Function, content)
    }

    /// Create a tool-result turn.
    pub fn observation(content: impl Into<String>) -> Self {
        Self::new(Role::Observation, content)
    }
}
