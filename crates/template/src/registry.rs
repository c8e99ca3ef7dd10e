//! Template registry: maps template names to [`Template`]s.
//!
//! The registry is built once at startup ([`TemplateRegistry::with_builtins`]
//! plus any templates from configuration) and read thereafter. Resolving a
//! template also prepares the tokenizer for it: eos/pad tokens, stop words
//! and the compiled chat template.

use crate::catalog;
use crate::compiler::compile;
use crate::formatter::Formatter;
use crate::slot::Slot;
use crate::template::{SystemInjection, Template};
use crate::tool_format::ToolFormat;
use promptloom_config::{FormatterConfig, SlotConfig, SystemInjectionConfig, TemplateConfig};
use promptloom_core::{TemplateError, Tokenizer};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Eos token installed when the tokenizer has none.
pub const DEFAULT_EOS_TOKEN: &str = "<|endoftext|>";

/// Name of the template used when none is requested.
pub const EMPTY_TEMPLATE: &str = "empty";

/// Everything needed to register a template. Unset formatters take the
/// registry defaults.
#[derive(Debug, Clone, Default)]
pub struct TemplateSpec {
    pub name: String,
    pub format_user: Option<Formatter>,
    pub format_assistant: Option<Formatter>,
    pub format_system: Option<Formatter>,
    pub format_function: Option<Formatter>,
    pub format_observation: Option<Formatter>,
    pub format_tools: Option<Formatter>,
    pub format_separator: Option<Formatter>,
    pub default_system: String,
    pub stop_words: Vec<String>,
    pub efficient_eos: bool,
    pub replace_eos: bool,
    pub force_system: bool,
    /// Inferred from the name when unset: `llama2*` templates prepend.
    pub system_injection: Option<SystemInjection>,
}

impl TemplateSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fill in defaults and produce the template.
    pub fn build(self) -> Result<Template, TemplateError> {
        let efficient_eos = self.efficient_eos;
        let with_eos = |text: &str| {
            let mut slots = vec![Slot::literal(text)];
            if !efficient_eos {
                slots.push(Slot::Eos);
            }
            slots
        };

        let default_user = Formatter::string(vec![Slot::literal("{{content}}")])?;
        let default_assistant = Formatter::string(with_eos("{{content}}"))?;
        let default_function =
            Formatter::function(with_eos("Action: {{name}}\nAction Input: {{arguments}}"))?;

        let format_user = self.format_user.unwrap_or_else(|| default_user.clone());
        let format_observation = self
            .format_observation
            .unwrap_or_else(|| format_user.clone());
        let system_injection = self.system_injection.unwrap_or_else(|| {
            if self.name.starts_with("llama2") {
                SystemInjection::PrependToFirstUser
            } else {
                SystemInjection::Leading
            }
        });

        Ok(Template {
            format_user,
            format_assistant: self.format_assistant.unwrap_or(default_assistant),
            format_system: self.format_system.unwrap_or(default_user),
            format_function: self.format_function.unwrap_or(default_function),
            format_observation,
            format_tools: self
                .format_tools
                .unwrap_or_else(|| Formatter::tool(ToolFormat::Default)),
            format_separator: self.format_separator.unwrap_or_default(),
            default_system: self.default_system,
            stop_words: self.stop_words,
            efficient_eos: self.efficient_eos,
            replace_eos: self.replace_eos,
            force_system: self.force_system,
            system_injection,
            name: self.name,
        })
    }
}

impl TryFrom<&TemplateConfig> for TemplateSpec {
    type Error = TemplateError;

    fn try_from(config: &TemplateConfig) -> Result<Self, Self::Error> {
        let formatter = |config: &Option<FormatterConfig>| {
            config.as_ref().map(formatter_from_config).transpose()
        };

        Ok(Self {
            name: config.name.clone(),
            format_user: formatter(&config.user)?,
            format_assistant: formatter(&config.assistant)?,
            format_system: formatter(&config.system)?,
            format_function: formatter(&config.function)?,
            format_observation: formatter(&config.observation)?,
            format_tools: formatter(&config.tools)?,
            format_separator: formatter(&config.separator)?,
            default_system: config.default_system.clone(),
            stop_words: config.stop_words.clone(),
            efficient_eos: config.efficient_eos,
            replace_eos: config.replace_eos,
            force_system: config.force_system,
            system_injection: config.system_injection.map(|injection| match injection {
                SystemInjectionConfig::Leading => SystemInjection::Leading,
                SystemInjectionConfig::PrependToFirstUser => SystemInjection::PrependToFirstUser,
            }),
        })
    }
}

fn formatter_from_config(config: &FormatterConfig) -> Result<Formatter, TemplateError> {
    let slots = |slots: &[SlotConfig]| slots.iter().map(slot_from_config).collect::<Vec<_>>();
    match config {
        FormatterConfig::Empty { slots: s } => Formatter::empty(slots(s)),
        FormatterConfig::String { slots: s } => Formatter::string(slots(s)),
        FormatterConfig::Function { slots: s } => Formatter::function(slots(s)),
        FormatterConfig::Tool { format } => Ok(Formatter::tool(format.parse()?)),
    }
}

fn slot_from_config(config: &SlotConfig) -> Slot {
    match config {
        SlotConfig::Text(text) => Slot::literal(text.as_str()),
        SlotConfig::Token(name) => Slot::token(name.as_str()),
        SlotConfig::Bos => Slot::Bos,
        SlotConfig::Eos => Slot::Eos,
    }
}

/// Name → template catalog.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in catalog.
    pub fn with_builtins() -> Result<Self, TemplateError> {
        let mut registry = Self::new();
        for spec in catalog::builtin_specs()? {
            registry.register(spec)?;
        }
        debug!(templates = registry.len(), "Registered built-in templates");
        Ok(registry)
    }

    /// Register a template. An existing template of the same name is replaced.
    pub fn register(&mut self, spec: TemplateSpec) -> Result<(), TemplateError> {
        let template = spec.build()?;
        if self.templates.contains_key(&template.name) {
            debug!(template = %template.name, "Replacing registered template");
        }
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Register a template described in configuration.
    pub fn register_config(&mut self, config: &TemplateConfig) -> Result<(), TemplateError> {
        let spec = TemplateSpec::try_from(config)?;
        info!(template = %spec.name, "Registered template from config");
        self.register(spec)
    }

    /// Get a template by name.
    pub fn get(&self, name: &str) -> Result<&Template, TemplateError> {
        self.templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// All registered template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Iterate over registered templates in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Look up a template (the `empty` template when `name` is `None`) and
    /// prepare the tokenizer for it.
    ///
    /// The tokenizer's eos token is replaced by the first stop word when the
    /// template asks for it, missing eos/pad tokens are filled in, the
    /// remaining stop words become special tokens, and the compiled chat
    /// template is installed if the template can be expressed in Jinja.
    pub fn resolve<T>(&self, tokenizer: &mut T, name: Option<&str>) -> Result<&Template, TemplateError>
    where
        T: Tokenizer + ?Sized,
    {
        let template = self.get(name.unwrap_or(EMPTY_TEMPLATE))?;
        let mut stop_words = template.stop_words.as_slice();

        if template.replace_eos {
            let Some((eos, rest)) = stop_words.split_first() else {
                return Err(TemplateError::MissingStopWords(template.name.clone()));
            };
            add_or_replace_eos_token(tokenizer, eos);
            stop_words = rest;
        }

        if tokenizer.eos_token_id().is_none() {
            add_or_replace_eos_token(tokenizer, DEFAULT_EOS_TOKEN);
        }

        if tokenizer.pad_token_id().is_none() {
            if let Some(eos) = tokenizer.eos_token().map(str::to_string) {
                tokenizer.set_pad_token(&eos);
                info!(pad_token = %eos, "Added pad token");
            }
        }

        if !stop_words.is_empty() {
            let added = tokenizer.add_special_tokens(stop_words, false);
            info!(stop_words = %stop_words.join(","), "Added stop words");
            if added > 0 {
                warn!(added, "New tokens have been added, make sure the vocabulary is resized");
            }
        }

        let installed = compile(template, &*tokenizer)
            .map_err(|e| e.to_string())
            .and_then(|jinja| tokenizer.set_chat_template(jinja).map_err(|e| e.to_string()));
        if let Err(reason) = installed {
            info!(template = %template.name, %reason, "Cannot add this chat template to tokenizer");
        }

        Ok(template)
    }
}

fn add_or_replace_eos_token<T>(tokenizer: &mut T, eos_token: &str)
where
    T: Tokenizer + ?Sized,
{
    let is_added = tokenizer.eos_token_id().is_none();
    let added = tokenizer.set_eos_token(eos_token);
    if is_added {
        info!(eos_token, "Added eos token");
    } else {
        info!(eos_token, "Replaced eos token");
    }
    if added > 0 {
        warn!(added, "New tokens have been added, make sure the vocabulary is resized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::FormatArgs;
    use crate::test_helpers::MockTokenizer;

    fn spec(name: &str) -> TemplateSpec {
        TemplateSpec {
            format_user: Some(
                Formatter::string(vec![Slot::literal("<u>{{content}}</u>")]).unwrap(),
            ),
            stop_words: vec!["<stop>".into(), "<halt>".into()],
            ..TemplateSpec::new(name)
        }
    }

    #[test]
    fn defaults_fill_unset_formatters() {
        let template = TemplateSpec::new("bare").build().unwrap();
        assert_eq!(
            template.format_assistant.apply(FormatArgs::content("x")),
            vec![Slot::literal("x"), Slot::Eos]
        );
        assert_eq!(
            template.format_system.apply(FormatArgs::content("s")),
            vec![Slot::literal("s")]
        );
        assert_eq!(template.format_tools, Formatter::tool(ToolFormat::Default));
        assert!(template.format_separator.apply(FormatArgs::none()).is_empty());
        assert_eq!(template.system_injection, SystemInjection::Leading);
    }

    #[test]
    fn efficient_eos_drops_eos_from_defaults() {
        let template = TemplateSpec {
            efficient_eos: true,
            ..TemplateSpec::new("lean")
        }
        .build()
        .unwrap();
        assert_eq!(
            template.format_assistant.apply(FormatArgs::content("x")),
            vec![Slot::literal("x")]
        );
        let call = template
            .format_function
            .apply(FormatArgs::content(r#"{"name": "f", "arguments": {}}"#));
        assert!(!call.contains(&Slot::Eos));
    }

    #[test]
    fn observation_defaults_to_user_override() {
        let template = spec("obs").build().unwrap();
        assert_eq!(template.format_observation, template.format_user);
    }

    #[test]
    fn llama2_names_prepend_system() {
        let template = TemplateSpec::new("llama2_custom").build().unwrap();
        assert_eq!(template.system_injection, SystemInjection::PrependToFirstUser);
    }

    #[test]
    fn registering_twice_is_idempotent() {
        let mut registry = TemplateRegistry::new();
        registry.register(spec("twice")).unwrap();
        let first = registry.get("twice").unwrap().clone();
        registry.register(spec("twice")).unwrap();

        assert_eq!(registry.len(), 1);
        let second = registry.get("twice").unwrap();
        assert_eq!(&first, second);
        assert_eq!(
            first.format_user.apply(FormatArgs::content("hi")),
            second.format_user.apply(FormatArgs::content("hi"))
        );
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = TemplateRegistry::new();
        registry.register(spec("t")).unwrap();
        registry
            .register(TemplateSpec {
                default_system: "override".into(),
                ..TemplateSpec::new("t")
            })
            .unwrap();
        assert_eq!(registry.get("t").unwrap().default_system, "override");
    }

    #[test]
    fn missing_template_is_not_found() {
        let registry = TemplateRegistry::new();
        assert_eq!(
            registry.get("nope").unwrap_err(),
            TemplateError::NotFound("nope".into())
        );
    }

    #[test]
    fn resolve_defaults_to_empty_template() {
        let registry = TemplateRegistry::with_builtins().unwrap();
        let mut tok = MockTokenizer::new().with_eos("</s>").with_pad("<pad>");
        let template = registry.resolve(&mut tok, None).unwrap();
        assert_eq!(template.name, EMPTY_TEMPLATE);
    }

    #[test]
    fn resolve_fills_missing_eos_and_pad() {
        let mut registry = TemplateRegistry::new();
        registry.register(TemplateSpec::new(EMPTY_TEMPLATE)).unwrap();
        let mut tok = MockTokenizer::new();

        registry.resolve(&mut tok, None).unwrap();
        assert_eq!(tok.eos_token(), Some(DEFAULT_EOS_TOKEN));
        assert_eq!(tok.pad_token(), Some(DEFAULT_EOS_TOKEN));
        assert!(tok.chat_template().is_some());
    }

    #[test]
    fn resolve_keeps_existing_pad() {
        let mut registry = TemplateRegistry::new();
        registry.register(TemplateSpec::new("t")).unwrap();
        let mut tok = MockTokenizer::new().with_eos("</s>").with_pad("<pad>");
        registry.resolve(&mut tok, Some("t")).unwrap();
        assert_eq!(tok.pad_token(), Some("<pad>"));
        assert_eq!(tok.eos_token(), Some("</s>"));
    }

    #[test]
    fn resolve_replaces_eos_with_first_stop_word() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(TemplateSpec {
                replace_eos: true,
                ..spec("replacing")
            })
            .unwrap();
        let mut tok = MockTokenizer::new().with_eos("</s>");

        registry.resolve(&mut tok, Some("replacing")).unwrap();
        assert_eq!(tok.eos_token(), Some("<stop>"));
        assert_eq!(tok.additional(), ["<halt>".to_string()]);
        assert_ne!(tok.token_to_id("<halt>"), MockTokenizer::UNK_ID);
    }

    #[test]
    fn resolve_registers_all_stop_words_without_replace() {
        let mut registry = TemplateRegistry::new();
        registry.register(spec("keeping")).unwrap();
        let mut tok = MockTokenizer::new().with_eos("</s>");

        registry.resolve(&mut tok, Some("keeping")).unwrap();
        assert_eq!(tok.eos_token(), Some("</s>"));
        assert_eq!(tok.additional(), ["<stop>".to_string(), "<halt>".to_string()]);
    }

    #[test]
    fn resolve_requires_stop_words_for_replace_eos() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(TemplateSpec {
                replace_eos: true,
                ..TemplateSpec::new("broken")
            })
            .unwrap();
        let mut tok = MockTokenizer::new();
        assert_eq!(
            registry.resolve(&mut tok, Some("broken")).unwrap_err(),
            TemplateError::MissingStopWords("broken".into())
        );
    }

    #[test]
    fn compile_failures_are_swallowed() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(TemplateSpec {
                format_user: Some(
                    Formatter::string(vec![Slot::token("<tok>"), Slot::literal("{{content}}")])
                        .unwrap(),
                ),
                ..TemplateSpec::new("tokens")
            })
            .unwrap();
        let mut tok = MockTokenizer::new().with_eos("</s>");
        assert!(registry.resolve(&mut tok, Some("tokens")).is_ok());
        assert!(tok.chat_template().is_none());

        registry.register(TemplateSpec::new("plain")).unwrap();
        let mut tok = MockTokenizer::new().with_eos("</s>").rejecting_chat_template();
        assert!(registry.resolve(&mut tok, Some("plain")).is_ok());
    }

    #[test]
    fn unknown_name_fails_before_side_effects() {
        let registry = TemplateRegistry::with_builtins().unwrap();
        let mut tok = MockTokenizer::new();
        assert!(registry.resolve(&mut tok, Some("nope")).is_err());
        assert!(tok.eos_token().is_none());
    }

    #[test]
    fn register_from_config() {
        let config: TemplateConfig = toml::from_str(
            r#"
            name = "custom"
            efficient_eos = true
            stop_words = ["<end>"]
            system_injection = "prepend_to_first_user"
            user = { kind = "string", slots = ["bos", { text = "[U]{{content}}" }] }
            separator = { kind = "empty", slots = [{ text = "\n" }] }
            tools = { kind = "tool", format = "glm4" }
            "#,
        )
        .unwrap();

        let mut registry = TemplateRegistry::new();
        registry.register_config(&config).unwrap();
        let template = registry.get("custom").unwrap();

        assert_eq!(
            template.format_user.apply(FormatArgs::content("x")),
            vec![Slot::Bos, Slot::literal("[U]x")]
        );
        assert_eq!(template.format_tools, Formatter::tool(ToolFormat::Glm4));
        assert_eq!(template.system_injection, SystemInjection::PrependToFirstUser);
        assert_eq!(
            template.format_assistant.apply(FormatArgs::content("y")),
            vec![Slot::literal("y")]
        );
    }

    #[test]
    fn invalid_config_formatter_is_rejected() {
        let config: TemplateConfig = toml::from_str(
            r#"
            name = "bad"
            user = { kind = "string", slots = [{ text = "no placeholder" }] }
            "#,
        )
        .unwrap();
        let mut registry = TemplateRegistry::new();
        assert!(matches!(
            registry.register_config(&config),
            Err(TemplateError::InvalidFormatter(_))
        ));
        assert!(registry.is_empty());
    }
}
