//! Shared test helpers for template tests.

use promptloom_core::{TokenId, Tokenizer, TokenizerError};
use std::collections::HashMap;

const CHAR_BASE: TokenId = 10_000;

/// A character-level tokenizer with a small special-token vocabulary.
///
/// Registered special tokens are matched greedily (longest first); every
/// other character maps to `CHAR_BASE + codepoint`. Because plain text is
/// tokenized per character, `encode(a + b) == encode(a) ++ encode(b)`
/// whenever no special token straddles the boundary.
#[derive(Debug, Default)]
pub struct MockTokenizer {
    vocab: HashMap<String, TokenId>,
    additional: Vec<String>,
    bos: Option<String>,
    eos: Option<String>,
    pad: Option<String>,
    chat_template: Option<String>,
    reject_chat_template: bool,
}

impl MockTokenizer {
    pub const UNK_ID: TokenId = 0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_special(mut self, token: &str) -> Self {
        self.intern(token);
        self
    }

    pub fn with_bos(mut self, token: &str) -> Self {
        self.intern(token);
        self.bos = Some(token.to_string());
        self
    }

    pub fn with_eos(mut self, token: &str) -> Self {
        self.intern(token);
        self.eos = Some(token.to_string());
        self
    }

    pub fn with_pad(mut self, token: &str) -> Self {
        self.intern(token);
        self.pad = Some(token.to_string());
        self
    }

    pub fn rejecting_chat_template(mut self) -> Self {
        self.reject_chat_template = true;
        self
    }

    pub fn chat_template(&self) -> Option<&str> {
        self.chat_template.as_deref()
    }

    pub fn additional(&self) -> &[String] {
        &self.additional
    }

    pub fn pad_token(&self) -> Option<&str> {
        self.pad.as_deref()
    }

    /// Inverse of `encode`, for readable assertions.
    pub fn decode(&self, ids: &[TokenId]) -> String {
        ids.iter()
            .map(|id| {
                if let Some((token, _)) = self.vocab.iter().find(|(_, v)| *v == id) {
                    token.clone()
                } else if *id >= CHAR_BASE {
                    char::from_u32(id - CHAR_BASE)
                        .map(String::from)
                        .unwrap_or_default()
                } else {
                    "<unk>".to_string()
                }
            })
            .collect()
    }

    /// Insert into the vocabulary; returns whether the entry is new.
    fn intern(&mut self, token: &str) -> bool {
        if self.vocab.contains_key(token) {
            return false;
        }
        let id = self.vocab.len() as TokenId + 1;
        self.vocab.insert(token.to_string(), id);
        true
    }

    fn special_at<'t>(&self, rest: &'t str) -> Option<&'t str> {
        self.vocab
            .keys()
            .filter(|token| rest.starts_with(token.as_str()))
            .max_by_key(|token| token.len())
            .map(|token| &rest[..token.len()])
    }
}

impl Tokenizer for MockTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, TokenizerError> {
        let mut ids = Vec::new();
        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            if let Some(special) = self.special_at(rest) {
                ids.push(self.vocab[special]);
                rest = &rest[special.len()..];
            } else {
                ids.push(CHAR_BASE + c as TokenId);
                rest = &rest[c.len_utf8()..];
            }
        }
        Ok(ids)
    }

    fn token_to_id(&self, token: &str) -> TokenId {
        self.vocab.get(token).copied().unwrap_or(Self::UNK_ID)
    }

    fn bos_token(&self) -> Option<&str> {
        self.bos.as_deref()
    }

    fn bos_token_id(&self) -> Option<TokenId> {
        self.bos.as_deref().map(|t| self.token_to_id(t))
    }

    fn eos_token(&self) -> Option<&str> {
        self.eos.as_deref()
    }

    fn eos_token_id(&self) -> Option<TokenId> {
        self.eos.as_deref().map(|t| self.token_to_id(t))
    }

    fn pad_token_id(&self) -> Option<TokenId> {
        self.pad.as_deref().map(|t| self.token_to_id(t))
    }

    fn add_special_tokens(&mut self, tokens: &[String], replace_existing: bool) -> usize {
        if replace_existing {
            self.additional.clear();
        }
        let mut added = 0;
        for token in tokens {
            if self.intern(token) {
                added += 1;
            }
            if !self.additional.contains(token) {
                self.additional.push(token.clone());
            }
        }
        added
    }

    fn set_eos_token(&mut self, token: &str) -> usize {
        let added = usize::from(self.intern(token));
        self.eos = Some(token.to_string());
        added
    }

    fn set_pad_token(&mut self, token: &str) {
        self.pad = Some(token.to_string());
    }

    fn set_chat_template(&mut self, template: String) -> Result<(), TokenizerError> {
        if self.reject_chat_template {
            return Err(TokenizerError::ChatTemplate("templates disabled".into()));
        }
        self.chat_template = Some(template);
        Ok(())
    }
}
