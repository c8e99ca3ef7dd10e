//! Per-model chat templates and the turn-encoding engine.
//!
//! A [`Template`] binds one [`Formatter`] per role. Encoding walks the
//! dialogue turn by turn, renders each turn into slots, resolves them to
//! ids and pairs them up under a [`TokenBudget`]:
//!
//! ```text
//! turn 0:  system + query    response
//! turn t:  sep + query       response
//! ```

use crate::budget::make_pairs;
use crate::formatter::{FormatArgs, Formatter};
use crate::slot::{Slot, resolve_slots};
use promptloom_config::EngineConfig;
use promptloom_core::{FunctionCall, Result, Role, TemplateError, TokenId, Tokenizer, Turn};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Where the rendered system prompt goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemInjection {
    /// System slots are emitted ahead of the first user turn.
    #[default]
    Leading,
    /// The rendered system text is glued onto the first user content, and
    /// no separate system slots are emitted (Llama 2 style).
    PrependToFirstUser,
}

/// Token limits applied while pairing turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    pub cutoff_len: usize,
    pub reserved_label_len: usize,
}

impl TokenBudget {
    pub fn new(cutoff_len: usize, reserved_label_len: usize) -> Self {
        Self {
            cutoff_len,
            reserved_label_len,
        }
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self::new(1_000_000, 1)
    }
}

impl From<&EngineConfig> for TokenBudget {
    fn from(config: &EngineConfig) -> Self {
        Self::new(config.cutoff_len, config.reserved_label_len)
    }
}

/// One prompt/response pair of token ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EncodedPair {
    pub prompt_ids: Vec<TokenId>,
    pub response_ids: Vec<TokenId>,
}

impl From<(Vec<TokenId>, Vec<TokenId>)> for EncodedPair {
    fn from((prompt_ids, response_ids): (Vec<TokenId>, Vec<TokenId>)) -> Self {
        Self {
            prompt_ids,
            response_ids,
        }
    }
}

/// A registered chat template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub format_user: Formatter,
    pub format_assistant: Formatter,
    pub format_system: Formatter,
    pub format_function: Formatter,
    pub format_observation: Formatter,
    pub format_tools: Formatter,
    pub format_separator: Formatter,
    pub default_system: String,
    pub stop_words: Vec<String>,
    pub efficient_eos: bool,
    pub replace_eos: bool,
    pub force_system: bool,
    pub system_injection: SystemInjection,
}

impl Template {
    /// Encode a dialogue into one prompt and one response.
    ///
    /// The prompt is every pair except the last response; the response is
    /// the last pair's response. A dialogue ending on an unanswered user or
    /// observation turn is a generation prompt: its response is empty. If
    /// the budget admits no pair at all, both sides are empty.
    pub fn encode_single_turn<T>(
        &self,
        tokenizer: &T,
        turns: &[Turn],
        system: Option<&str>,
        tools: Option<&str>,
        budget: TokenBudget,
    ) -> Result<EncodedPair>
    where
        T: Tokenizer + ?Sized,
    {
        if turns.is_empty() {
            return Err(TemplateError::EmptyDialogue.into());
        }

        let mut pairs = self.encode(tokenizer, turns, system, tools, budget, true)?;
        let Some((last_prompt, response_ids)) = pairs.pop() else {
            return Ok(EncodedPair::default());
        };

        let mut prompt_ids = Vec::new();
        for (query, response) in pairs {
            prompt_ids.extend(query);
            prompt_ids.extend(response);
        }
        prompt_ids.extend(last_prompt);

        Ok(EncodedPair {
            prompt_ids,
            response_ids,
        })
    }

    /// Encode a dialogue into one prompt/response pair per round.
    pub fn encode_multi_turn<T>(
        &self,
        tokenizer: &T,
        turns: &[Turn],
        system: Option<&str>,
        tools: Option<&str>,
        budget: TokenBudget,
    ) -> Result<Vec<EncodedPair>>
    where
        T: Tokenizer + ?Sized,
    {
        let pairs = self.encode(tokenizer, turns, system, tools, budget, false)?;
        Ok(pairs.into_iter().map(EncodedPair::from).collect())
    }

    /// Recognize a function call in generated assistant content.
    pub fn extract_tool_call(&self, content: &str) -> Option<FunctionCall> {
        self.format_tools.extract(content)
    }

    fn encode<T>(
        &self,
        tokenizer: &T,
        turns: &[Turn],
        system: Option<&str>,
        tools: Option<&str>,
        budget: TokenBudget,
        open_ended: bool,
    ) -> Result<Vec<(Vec<TokenId>, Vec<TokenId>)>>
    where
        T: Tokenizer + ?Sized,
    {
        let awaiting_response = turns.len() % 2 != 0;
        if awaiting_response {
            let prompt_last = turns
                .last()
                .is_some_and(|turn| matches!(turn.role, Role::User | Role::Observation));
            if !(open_ended && prompt_last) {
                return Err(TemplateError::OddTurnCount(turns.len()).into());
            }
        }

        let system = system
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_system);
        let tools = tools.filter(|t| !t.is_empty());

        let mut encoded = Vec::with_capacity(turns.len());
        for (i, turn) in turns.iter().enumerate() {
            let mut slots = Vec::new();
            let mut system_text = String::new();

            if i == 0 && (!system.is_empty() || tools.is_some() || self.force_system) {
                let rendered = self.render_system(system, tools);
                match self.system_injection {
                    SystemInjection::Leading => slots.extend(rendered),
                    SystemInjection::PrependToFirstUser => {
                        system_text = first_literal(&rendered)
                            .ok_or_else(|| {
                                TemplateError::InvalidFormatter(format!(
                                    "template {} must render the system prompt as a leading literal",
                                    self.name
                                ))
                            })?
                            .to_string();
                    }
                }
            } else if i > 0 && i % 2 == 0 {
                slots.extend(self.format_separator.apply(FormatArgs::none()));
            }

            match turn.role {
                Role::User => {
                    let idx = (i / 2).to_string();
                    let content = if system_text.is_empty() {
                        Cow::Borrowed(turn.content.as_str())
                    } else {
                        Cow::Owned(format!("{system_text}{}", turn.content))
                    };
                    slots.extend(
                        self.format_user
                            .apply(FormatArgs::content(&content).with_idx(&idx)),
                    );
                }
                Role::Assistant => {
                    slots.extend(self.format_assistant.apply(FormatArgs::content(&turn.content)))
                }
                Role::Observation => slots
                    .extend(self.format_observation.apply(FormatArgs::content(&turn.content))),
                Role::Function => {
                    slots.extend(self.format_function.apply(FormatArgs::content(&turn.content)))
                }
                Role::System => {
                    return Err(TemplateError::UnexpectedRole(turn.role.to_string()).into());
                }
            }

            encoded.push(resolve_slots(tokenizer, &slots)?);
        }
        if awaiting_response {
            encoded.push(Vec::new());
        }

        let pairs = make_pairs(encoded, budget.cutoff_len, budget.reserved_label_len);
        debug!(
            template = %self.name,
            turns = turns.len(),
            pairs = pairs.len(),
            "Encoded dialogue"
        );
        Ok(pairs)
    }

    fn render_system(&self, system: &str, tools: Option<&str>) -> Vec<Slot> {
        let tool_text = tools
            .map(|manifest| {
                let rendered = self.format_tools.apply(FormatArgs::content(manifest));
                first_literal(&rendered).unwrap_or_default().to_string()
            })
            .unwrap_or_default();
        let content = format!("{system}{tool_text}");
        self.format_system.apply(FormatArgs::content(&content))
    }
}

fn first_literal(slots: &[Slot]) -> Option<&str> {
    slots.first().and_then(Slot::as_literal)
}
