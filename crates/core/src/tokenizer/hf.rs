//! Hugging Face `tokenizers` adapter.
//!
//! `tokenizer.json` only carries the vocabulary and the pipeline; the named
//! special tokens (bos/eos/pad/unk) and any chat template live in the sibling
//! `tokenizer_config.json`, which is read when present.

use super::{TokenId, Tokenizer};
use crate::error::TokenizerError;
use serde_json::Value;
use std::path::Path;
use tokenizers::AddedToken;
use tracing::debug;

/// Named special tokens tracked next to the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialTokens {
    pub bos: Option<String>,
    pub eos: Option<String>,
    pub pad: Option<String>,
    pub unk: Option<String>,
    pub additional: Vec<String>,
}

impl SpecialTokens {
    /// Read the special-token fields of a `tokenizer_config.json` document.
    pub fn from_config(config: &Value) -> Self {
        let additional = config
            .get("additional_special_tokens")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(token_text).collect())
            .unwrap_or_default();
        Self {
            bos: config.get("bos_token").and_then(token_text),
            eos: config.get("eos_token").and_then(token_text),
            pad: config.get("pad_token").and_then(token_text),
            unk: config.get("unk_token").and_then(token_text),
            additional,
        }
    }
}

/// Tokens appear either as plain strings or as `{"content": ...}` objects.
fn token_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("content").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// A [`Tokenizer`] backed by `tokenizers::Tokenizer`.
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
    special: SpecialTokens,
    chat_template: Option<String>,
}

impl HfTokenizer {
    pub fn new(inner: tokenizers::Tokenizer, special: SpecialTokens) -> Self {
        Self {
            inner,
            special,
            chat_template: None,
        }
    }

    /// Load `tokenizer.json` and, if it exists, the sibling `tokenizer_config.json`.
    pub fn from_file(path: &Path) -> Result<Self, TokenizerError> {
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| TokenizerError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config_path = path.with_file_name("tokenizer_config.json");
        let config = if config_path.exists() {
            let raw = std::fs::read_to_string(&config_path).map_err(|e| TokenizerError::Load {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;
            serde_json::from_str::<Value>(&raw).map_err(|e| TokenizerError::Load {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            debug!(path = %config_path.display(), "No tokenizer_config.json, special tokens unset");
            Value::Null
        };

        let mut tokenizer = Self::new(inner, SpecialTokens::from_config(&config));
        tokenizer.chat_template = config
            .get("chat_template")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(tokenizer)
    }

    /// The currently installed chat template, if any.
    pub fn chat_template(&self) -> Option<&str> {
        self.chat_template.as_deref()
    }

    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special
    }

    /// Vocabulary size including added tokens.
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    fn id_of(&self, token: Option<&str>) -> Option<TokenId> {
        token.and_then(|t| self.inner.token_to_id(t))
    }

    /// Add tokens to the vocabulary as special tokens, returning the growth.
    fn grow_vocab(&mut self, tokens: &[String]) -> usize {
        let before = self.vocab_size();
        let added: Vec<AddedToken> = tokens
            .iter()
            .map(|t| AddedToken::from(t.clone(), true))
            .collect();
        self.inner.add_special_tokens(&added);
        self.vocab_size().saturating_sub(before)
    }
}

impl Tokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, TokenizerError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn token_to_id(&self, token: &str) -> TokenId {
        self.inner
            .token_to_id(token)
            .or_else(|| self.id_of(self.special.unk.as_deref()))
            .unwrap_or(0)
    }

    fn bos_token(&self) -> Option<&str> {
        self.special.bos.as_deref()
    }

    fn bos_token_id(&self) -> Option<TokenId> {
        self.id_of(self.special.bos.as_deref())
    }

    fn eos_token(&self) -> Option<&str> {
        self.special.eos.as_deref()
    }

    fn eos_token_id(&self) -> Option<TokenId> {
        self.id_of(self.special.eos.as_deref())
    }

    fn pad_token_id(&self) -> Option<TokenId> {
        self.id_of(self.special.pad.as_deref())
    }

    fn add_special_tokens(&mut self, tokens: &[String], replace_existing: bool) -> usize {
        if replace_existing {
            self.special.additional.clear();
        }
        for token in tokens {
            if !self.special.additional.contains(token) {
                self.special.additional.push(token.clone());
            }
        }
        self.grow_vocab(tokens)
    }

    fn set_eos_token(&mut self, token: &str) -> usize {
        self.special.eos = Some(token.to_string());
        self.grow_vocab(&[token.to_string()])
    }

    fn set_pad_token(&mut self, token: &str) {
        self.special.pad = Some(token.to_string());
    }

    fn set_chat_template(&mut self, template: String) -> Result<(), TokenizerError> {
        self.chat_template = Some(template);
        Ok(())
    }
}
