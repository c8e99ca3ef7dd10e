//! Slots, the atomic formatting unit.
//!
//! A formatter renders a role's content into an ordered list of slots;
//! concatenation order is token order. Slots are turned into ids by
//! [`resolve_slots`] against the tokenizer's *current* special tokens.

use promptloom_core::{TokenId, Tokenizer, TokenizerError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Verbatim text, tokenized without special-token insertion.
    Literal(String),
    /// A vocabulary entry looked up by name.
    Token(String),
    /// The tokenizer's beginning-of-sequence token.
    Bos,
    /// The tokenizer's end-of-sequence token.
    Eos,
}

impl Slot {
    pub fn literal(text: impl Into<String>) -> Self {
        Slot::Literal(text.into())
    }

    pub fn token(name: impl Into<String>) -> Self {
        Slot::Token(name.into())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Slot::Literal(text) => Some(text),
            _ => None,
        }
    }
}

/// Resolve a slot sequence to a flat list of token ids.
///
/// Empty literals contribute nothing; `Bos`/`Eos` are skipped when the
/// tokenizer has no such id registered.
pub fn resolve_slots<T>(tokenizer: &T, slots: &[Slot]) -> Result<Vec<TokenId>, TokenizerError>
where
    T: Tokenizer + ?Sized,
{
    let mut ids = Vec::new();
    for slot in slots {
        match slot {
            Slot::Literal(text) => {
                if !text.is_empty() {
                    ids.extend(tokenizer.encode(text)?);
                }
            }
            Slot::Token(name) => ids.push(tokenizer.token_to_id(name)),
            Slot::Bos => ids.extend(tokenizer.bos_token_id()),
            Slot::Eos => ids.extend(tokenizer.eos_token_id()),
        }
    }
    Ok(ids)
}
