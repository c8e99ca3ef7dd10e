//! Formatters render one role's content into slots.
//!
//! Literal slots may carry `{{name}}` placeholders. Which placeholders a
//! formatter must (or must not) contain is checked at construction, so a
//! registered template can always be applied. Applying a formatter with no
//! arguments returns its literal skeleton, placeholders intact; the
//! compiler relies on that to introspect the template shape.

use crate::slot::Slot;
use crate::tool_format::{ToolFormat, to_json_spaced};
use promptloom_core::{FunctionCall, TemplateError};
use regex_lite::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// `{{name}}` placeholders; group 1 is the name.
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").expect("placeholder pattern is valid")
});

/// Named arguments a formatter may substitute.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatArgs<'a> {
    /// Substituted for `{{content}}`: turn text, or a JSON payload for function and tool formatters.
    pub content: Option<&'a str>,
    /// Substituted for `{{idx}}`: zero-based round index.
    pub idx: Option<&'a str>,
}

impl<'a> FormatArgs<'a> {
    /// No arguments: yields the formatter skeleton.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn content(content: &'a str) -> Self {
        Self {
            content: Some(content),
            idx: None,
        }
    }

    pub fn with_idx(mut self, idx: &'a str) -> Self {
        self.idx = Some(idx);
        self
    }
}

/// Constant slots, ignoring any input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmptyFormatter {
    slots: Vec<Slot>,
}

impl EmptyFormatter {
    pub fn new(slots: Vec<Slot>) -> Result<Self, TemplateError> {
        if slots.iter().any(has_placeholder) {
            return Err(TemplateError::InvalidFormatter(
                "empty formatter should not contain any placeholder".into(),
            ));
        }
        Ok(Self { slots })
    }
}

/// Literal fragments with named placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringFormatter {
    slots: Vec<Slot>,
}

impl StringFormatter {
    pub fn new(slots: Vec<Slot>) -> Result<Self, TemplateError> {
        if !slots.iter().any(has_placeholder) {
            return Err(TemplateError::InvalidFormatter(
                "a placeholder is required in the string formatter".into(),
            ));
        }
        Ok(Self { slots })
    }

    fn apply(&self, args: FormatArgs<'_>) -> Vec<Slot> {
        let substitutions = [("{{content}}", args.content), ("{{idx}}", args.idx)];
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Literal(text) => {
                    let mut text = text.clone();
                    for (placeholder, value) in substitutions {
                        if let Some(value) = value {
                            text = text.replacen(placeholder, value, 1);
                        }
                    }
                    Slot::Literal(text)
                }
                other => other.clone(),
            })
            .collect()
    }
}

/// Renders a `{"name": ..., "arguments": ...}` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionFormatter {
    slots: Vec<Slot>,
}

impl FunctionFormatter {
    pub fn new(slots: Vec<Slot>) -> Result<Self, TemplateError> {
        let has = |needle: &str| {
            slots
                .iter()
                .filter_map(Slot::as_literal)
                .any(|text| text.contains(needle))
        };
        if !has("{{name}}") || !has("{{arguments}}") {
            return Err(TemplateError::InvalidFormatter(
                "name and arguments placeholders are required in the function formatter".into(),
            ));
        }
        Ok(Self { slots })
    }

    fn apply(&self, args: FormatArgs<'_>) -> Vec<Slot> {
        let Some(content) = args.content else {
            return self.slots.clone();
        };
        let call = parse_function_call(content).unwrap_or(FunctionCall {
            name: String::new(),
            arguments: String::new(),
        });
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Literal(text) => Slot::Literal(
                    text.replace("{{name}}", &call.name)
                        .replace("{{arguments}}", &call.arguments),
                ),
                other => other.clone(),
            })
            .collect()
    }
}

fn parse_function_call(content: &str) -> Option<FunctionCall> {
    let value: Value = serde_json::from_str(content).ok()?;
    let name = value.get("name")?.as_str()?.to_string();
    let arguments = to_json_spaced(value.get("arguments")?);
    Some(FunctionCall { name, arguments })
}

/// Renders a tool manifest into a single literal slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolFormatter {
    format: ToolFormat,
}

impl ToolFormatter {
    pub fn new(format: ToolFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ToolFormat {
        self.format
    }

    fn apply(&self, args: FormatArgs<'_>) -> Vec<Slot> {
        let text = args
            .content
            .map(|manifest| self.format.render(manifest))
            .unwrap_or_default();
        vec![Slot::Literal(text)]
    }
}

/// A role formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    Empty(EmptyFormatter),
    String(StringFormatter),
    Function(FunctionFormatter),
    Tool(ToolFormatter),
}

impl Formatter {
    pub fn empty(slots: Vec<Slot>) -> Result<Self, TemplateError> {
        EmptyFormatter::new(slots).map(Formatter::Empty)
    }

    pub fn string(slots: Vec<Slot>) -> Result<Self, TemplateError> {
        StringFormatter::new(slots).map(Formatter::String)
    }

    pub fn function(slots: Vec<Slot>) -> Result<Self, TemplateError> {
        FunctionFormatter::new(slots).map(Formatter::Function)
    }

    pub fn tool(format: ToolFormat) -> Self {
        Formatter::Tool(ToolFormatter::new(format))
    }

    /// Render the given arguments into slots.
    pub fn apply(&self, args: FormatArgs<'_>) -> Vec<Slot> {
        match self {
            Formatter::Empty(f) => f.slots.clone(),
            Formatter::String(f) => f.apply(args),
            Formatter::Function(f) => f.apply(args),
            Formatter::Tool(f) => f.apply(args),
        }
    }

    /// Recognize a function call in model output; only tool formatters can.
    pub fn extract(&self, content: &str) -> Option<FunctionCall> {
        match self {
            Formatter::Tool(f) => f.format.extract(content),
            _ => None,
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::Empty(EmptyFormatter::default())
    }
}

fn has_placeholder(slot: &Slot) -> bool {
    slot.as_literal()
        .is_some_and(|text| PLACEHOLDER_RE.is_match(text))
}
