//! Compiles a [`Template`] into an equivalent Jinja chat template.
//!
//! The output only uses the subset of Jinja that chat-template consumers
//! understand: `set`, `if`, one `for` over `messages`, string literals and
//! `+`. Formatter skeletons (formatters applied with no arguments) are
//! translated slot by slot; `{{content}}` becomes a Jinja variable.

use crate::formatter::{FormatArgs, PLACEHOLDER_RE};
use crate::slot::Slot;
use crate::template::{SystemInjection, Template};
use promptloom_core::{CompileError, Tokenizer};

const CONTENT: &str = "{{content}}";

/// Render `template` as a Jinja chat template.
///
/// Bos/eos slots are frozen to the tokenizer's token strings at the time of
/// compilation, since the consumer's own `eos_token` may be redefined later.
pub fn compile<T>(template: &Template, tokenizer: &T) -> Result<String, CompileError>
where
    T: Tokenizer + ?Sized,
{
    let mut jinja = String::new();

    if !template.default_system.is_empty() {
        jinja.push_str(&format!(
            "{{% set system_message = '{}' %}}",
            escape(&template.default_system)
        ));
    }
    jinja.push_str(
        "{% if messages[0]['role'] == 'system' %}\
         {% set system_message = messages[0]['content'] %}\
         {% endif %}",
    );

    let system = slots_to_jinja(
        "system",
        &template.format_system.apply(FormatArgs::none()),
        tokenizer,
        "system_message",
    )?;
    match template.system_injection {
        SystemInjection::PrependToFirstUser => {}
        SystemInjection::Leading if template.force_system => {
            jinja.push_str(&format!("{{{{ {system} }}}}"));
        }
        SystemInjection::Leading => {
            jinja.push_str(&format!(
                "{{% if system_message is defined %}}{{{{ {system} }}}}{{% endif %}}"
            ));
        }
    }

    jinja.push_str("{% for message in messages %}");
    jinja.push_str("{% set content = message['content'] %}");
    if template.system_injection == SystemInjection::PrependToFirstUser {
        // The first user message sits behind a leading system message, if any.
        jinja.push_str(&format!(
            "{{% if message['role'] == 'user' \
             and loop.index0 == (1 if messages[0]['role'] == 'system' else 0) \
             and system_message is defined %}}\
             {{% set content = {system} + message['content'] %}}\
             {{% endif %}}"
        ));
    }

    let user = slots_to_jinja(
        "user",
        &template.format_user.apply(FormatArgs::none()),
        tokenizer,
        "content",
    )?;
    jinja.push_str(&format!(
        "{{% if message['role'] == 'user' %}}{{{{ {user} }}}}"
    ));

    let mut assistant_slots = template.format_assistant.apply(FormatArgs::none());
    assistant_slots.extend(template.format_separator.apply(FormatArgs::none()));
    let assistant = slots_to_jinja("assistant", &assistant_slots, tokenizer, "content")?;
    jinja.push_str(&format!(
        "{{% elif message['role'] == 'assistant' %}}{{{{ {assistant} }}}}"
    ));

    jinja.push_str("{% endif %}{% endfor %}");
    Ok(jinja)
}

/// Translate a slot skeleton into a Jinja `+` expression.
fn slots_to_jinja<T>(
    role: &str,
    slots: &[Slot],
    tokenizer: &T,
    placeholder: &str,
) -> Result<String, CompileError>
where
    T: Tokenizer + ?Sized,
{
    let mut items = Vec::new();
    for slot in slots {
        match slot {
            Slot::Literal(text) => {
                if let Some(other) = PLACEHOLDER_RE
                    .captures_iter(text)
                    .filter_map(|c| c.get(1))
                    .find(|m| m.as_str() != "content")
                {
                    return Err(unsupported(
                        role,
                        format!("placeholder {{{{{}}}}} has no Jinja counterpart", other.as_str()),
                    ));
                }
                for (i, piece) in text.split(CONTENT).enumerate() {
                    if i > 0 {
                        items.push(placeholder.to_string());
                    }
                    if !piece.is_empty() {
                        items.push(quote(piece));
                    }
                }
            }
            Slot::Bos => {
                if tokenizer.bos_token_id().is_some() {
                    items.extend(tokenizer.bos_token().map(quote));
                }
            }
            Slot::Eos => {
                if tokenizer.eos_token_id().is_some() {
                    items.extend(tokenizer.eos_token().map(quote));
                }
            }
            Slot::Token(name) => {
                return Err(unsupported(
                    role,
                    format!("token slot {name} cannot be expressed as text"),
                ));
            }
        }
    }

    if items.is_empty() {
        return Ok("''".to_string());
    }
    Ok(items.join(" + "))
}

fn unsupported(role: &str, reason: String) -> CompileError {
    CompileError::Unsupported {
        role: role.to_string(),
        reason,
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", escape(text))
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::Formatter;
    use crate::registry::{TemplateRegistry, TemplateSpec};
    use crate::template::TokenBudget;
    use crate::test_helpers::MockTokenizer;
    use minijinja::{Environment, context};
    use promptloom_core::Turn;

    fn render(jinja: &str, messages: &[(&str, &str)]) -> String {
        let messages: Vec<_> = messages
            .iter()
            .map(|(role, content)| context! { role => *role, content => *content })
            .collect();
        Environment::new()
            .render_str(jinja, context! { messages => messages })
            .unwrap()
    }

    fn chatml_tokenizer() -> MockTokenizer {
        MockTokenizer::new()
            .with_eos("<|im_end|>")
            .with_special("<|im_start|>")
    }

    #[test]
    fn chatml_compiles_to_expected_source() {
        let registry = TemplateRegistry::with_builtins().unwrap();
        let template = registry.get("chatml").unwrap();
        let jinja = compile(template, &chatml_tokenizer()).unwrap();

        assert!(jinja.starts_with("{% set system_message = 'You are a helpful assistant.' %}"));
        assert!(jinja.contains(
            "{% if system_message is defined %}{{ '<|im_start|>system\n' + system_message + '<|im_end|>\n' }}{% endif %}"
        ));
        assert!(jinja.contains(
            "{% if message['role'] == 'user' %}{{ '<|im_start|>user\n' + content + '<|im_end|>\n<|im_start|>assistant\n' }}"
        ));
        assert!(jinja.contains(
            "{% elif message['role'] == 'assistant' %}{{ content + '<|im_end|>' + '\n' }}"
        ));
        assert!(jinja.ends_with("{% endif %}{% endfor %}"));
    }

    #[test]
    fn rendered_chatml_matches_encoder() {
        let registry = TemplateRegistry::with_builtins().unwrap();
        let template = registry.get("chatml").unwrap();
        let tok = chatml_tokenizer();
        let jinja = compile(template, &tok).unwrap();

        let turns = vec![
            Turn::user("hi"),
            Turn::assistant("hello"),
            Turn::user("it's me"),
            Turn::assistant("ok"),
        ];
        let encoded = template
            .encode_single_turn(&tok, &turns, None, None, TokenBudget::default())
            .unwrap();
        let mut ids = encoded.prompt_ids;
        ids.extend(encoded.response_ids);

        let rendered = render(
            &jinja,
            &[
                ("user", "hi"),
                ("assistant", "hello"),
                ("user", "it's me"),
                ("assistant", "ok"),
            ],
        );
        // The trailing separator after the last reply is not part of the
        // encoded dialogue.
        let rendered = rendered.strip_suffix('\n').unwrap();
        assert_eq!(tok.encode(rendered).unwrap(), ids);
    }

    #[test]
    fn explicit_system_message_overrides_default() {
        let registry = TemplateRegistry::with_builtins().unwrap();
        let template = registry.get("chatml").unwrap();
        let jinja = compile(template, &chatml_tokenizer()).unwrap();

        let rendered = render(&jinja, &[("system", "Be brief."), ("user", "hi")]);
        assert_eq!(
            rendered,
            "<|im_start|>system\nBe brief.<|im_end|>\n<|im_start|>user\nhi<|im_end|>\n<|im_start|>assistant\n"
        );
    }

    #[test]
    fn prepend_injection_splices_into_loop() {
        let template = TemplateSpec {
            format_user: Some(Formatter::string(vec![Slot::literal("[INST] {{content}} [/INST]")]).unwrap()),
            format_system: Some(
                Formatter::string(vec![Slot::literal("<<SYS>>\n{{content}}\n<</SYS>>\n\n")]).unwrap(),
            ),
            default_system: "Be kind.".into(),
            ..TemplateSpec::new("llama2_test")
        }
        .build()
        .unwrap();
        let jinja = compile(&template, &MockTokenizer::new()).unwrap();

        assert!(!jinja.contains("{% if system_message is defined %}{{"));
        assert_eq!(
            render(&jinja, &[("user", "hi")]),
            "[INST] <<SYS>>\nBe kind.\n<</SYS>>\n\nhi [/INST]"
        );
    }

    #[test]
    fn prepend_injection_follows_leading_system_message() {
        let template = TemplateSpec {
            format_user: Some(Formatter::string(vec![Slot::literal("[INST] {{content}} [/INST]")]).unwrap()),
            format_system: Some(
                Formatter::string(vec![Slot::literal("<<SYS>>\n{{content}}\n<</SYS>>\n\n")]).unwrap(),
            ),
            ..TemplateSpec::new("llama2_test")
        }
        .build()
        .unwrap();
        let tok = MockTokenizer::new().with_eos("</s>");
        let jinja = compile(&template, &tok).unwrap();

        let rendered = render(&jinja, &[("system", "Be brief."), ("user", "hi")]);
        assert_eq!(rendered, "[INST] <<SYS>>\nBe brief.\n<</SYS>>\n\nhi [/INST]");

        let encoded = template
            .encode_single_turn(&tok, &[Turn::user("hi")], Some("Be brief."), None, TokenBudget::default())
            .unwrap();
        assert!(encoded.response_ids.is_empty());
        assert_eq!(tok.encode(&rendered).unwrap(), encoded.prompt_ids);

        // Only the first user message carries the system text.
        let rendered = render(
            &jinja,
            &[("system", "S"), ("user", "a"), ("assistant", "b"), ("user", "c")],
        );
        assert_eq!(rendered, "[INST] <<SYS>>\nS\n<</SYS>>\n\na [/INST]b</s>[INST] c [/INST]");
    }

    #[test]
    fn forced_system_is_unconditional() {
        let template = TemplateSpec {
            format_system: Some(Formatter::string(vec![Slot::Bos, Slot::literal("{{content}}")]).unwrap()),
            force_system: true,
            ..TemplateSpec::new("forced")
        }
        .build()
        .unwrap();
        let tok = MockTokenizer::new().with_bos("<s>");
        let jinja = compile(&template, &tok).unwrap();
        assert!(jinja.contains("{% endif %}{{ '<s>' + system_message }}{% for"));
    }

    #[test]
    fn unregistered_markers_are_skipped() {
        let template = TemplateSpec::new("bare").build().unwrap();
        let jinja = compile(&template, &MockTokenizer::new()).unwrap();
        assert!(jinja.contains("{% elif message['role'] == 'assistant' %}{{ content }}"));
    }

    #[test]
    fn quotes_are_escaped() {
        let template = TemplateSpec {
            default_system: "It's fine.".into(),
            ..TemplateSpec::new("quoted")
        }
        .build()
        .unwrap();
        let jinja = compile(&template, &MockTokenizer::new()).unwrap();
        assert!(jinja.contains(r"'It\'s fine.'"));
        assert_eq!(render(&jinja, &[("user", "hi")]), "It's fine.hi");
    }

    #[test]
    fn token_slots_are_unsupported() {
        let registry = TemplateRegistry::with_builtins().unwrap();
        let err = compile(registry.get("baichuan").unwrap(), &MockTokenizer::new()).unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { ref role, .. } if role == "user"));
    }

    #[test]
    fn non_content_placeholders_are_unsupported() {
        let template = TemplateSpec {
            format_user: Some(Formatter::string(vec![Slot::literal("[{{idx}}] {{content}}")]).unwrap()),
            ..TemplateSpec::new("indexed")
        }
        .build()
        .unwrap();
        let err = compile(&template, &MockTokenizer::new()).unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { ref reason, .. } if reason.contains("idx")));
    }

    #[test]
    fn every_builtin_compiles_or_fails_cleanly() {
        let registry = TemplateRegistry::with_builtins().unwrap();
        let tok = MockTokenizer::new().with_bos("<s>").with_eos("</s>");
        for template in registry.iter() {
            if let Ok(jinja) = compile(template, &tok) {
                let mut env = Environment::new();
                env.add_template("chat", &jinja)
                    .unwrap_or_else(|e| panic!("{} does not parse: {e}", template.name));
            }
        }
    }
}
