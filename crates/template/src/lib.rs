//! # promptloom Template
//!
//! The chat-template engine. A [`Template`] turns a dialogue into
//! prompt/response token-id pairs under a length budget, and the
//! [`compile`] function turns the same template into a Jinja chat template
//! for consumers that only speak Jinja.
//!
//! ```text
//! Turn ──▶ Formatter::apply ──▶ [Slot] ──▶ resolve_slots ──▶ ids ──▶ make_pairs ──▶ EncodedPair
//!                                                                  (infer_max_len)
//! ```
//!
//! Templates are registered in a [`TemplateRegistry`], which also prepares a
//! tokenizer for the template it resolves.

pub mod budget;
pub mod catalog;
pub mod compiler;
pub mod formatter;
pub mod registry;
pub mod slot;
pub mod template;
pub mod tool_format;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use budget::{infer_max_len, make_pairs};
pub use compiler::compile;
pub use formatter::{FormatArgs, Formatter};
pub use registry::{TemplateRegistry, TemplateSpec};
pub use slot::{Slot, resolve_slots};
pub use template::{EncodedPair, SystemInjection, Template, TokenBudget};
pub use tool_format::ToolFormat;
