//! Tokenizer contract.
//!
//! The encoder never tokenizes by itself: it drives an implementation of
//! [`Tokenizer`] and reads its current special-token configuration. The
//! special-token setters mutate that configuration, so they take `&mut self`
//! and cannot race with an encode call borrowing the same tokenizer.

#[cfg(feature = "hf")]
mod hf;

use crate::error::TokenizerError;

#[cfg(feature = "hf")]
pub use hf::{HfTokenizer, SpecialTokens};

/// Integer id of a vocabulary entry.
pub type TokenId = u32;

/// Trait for tokenizers that convert text to token ids and manage special tokens.
pub trait Tokenizer {
    /// Encode text to token ids without inserting any special tokens.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, TokenizerError>;

    /// Look up a single vocabulary entry. Unknown tokens map to the
    /// tokenizer's unknown id rather than failing.
    fn token_to_id(&self, token: &str) -> TokenId;

    /// Beginning-of-sequence token text, if one is registered.
    fn bos_token(&self) -> Option<&str>;

    /// Beginning-of-sequence token id, if one is registered.
    fn bos_token_id(&self) -> Option<TokenId>;

    /// End-of-sequence token text, if one is registered.
    fn eos_token(&self) -> Option<&str>;

    /// End-of-sequence token id, if one is registered.
    fn eos_token_id(&self) -> Option<TokenId>;

    /// Padding token id, if one is registered.
    fn pad_token_id(&self) -> Option<TokenId>;

    /// Register additional special tokens. Returns how many entries were
    /// added to the vocabulary.
    fn add_special_tokens(&mut self, tokens: &[String], replace_existing: bool) -> usize;

    /// Redefine the end-of-sequence token. Returns how many entries were
    /// added to the vocabulary.
    fn set_eos_token(&mut self, token: &str) -> usize;

    /// Alias the padding token to an existing token.
    fn set_pad_token(&mut self, token: &str);

    /// Install a self-contained chat template string.
    ///
    /// # Errors
    /// Returns an error if the tokenizer refuses the template.
    fn set_chat_template(&mut self, template: String) -> Result<(), TokenizerError>;
}
