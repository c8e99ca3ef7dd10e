//! Tool manifest rendering and tool-call extraction.
//!
//! Each [`ToolFormat`] is a named convention pairing a manifest renderer
//! (what the model is told about available tools) with an extractor (how a
//! function call is recognized in the model's reply).

use promptloom_core::{FunctionCall, TemplateError, ToolDefinition};
use regex_lite::Regex;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::Formatter;
use std::io;
use std::str::FromStr;
use std::sync::LazyLock;

const TOOL_SYSTEM_PROMPT_HEAD: &str = "You have access to the following tools:\n";

const JSON_FORMAT_PROMPT: &str = r#", in a JSON format representing the kwargs (e.g. ```{"input": "hello world", "num_beams": 5}```)"#;

const GLM4_TOOL_PROMPT: &str = "你是一个名为 ChatGLM 的人工智能助手。你是基于智谱AI训练的语言模型 GLM-4 模型开发的，\
你的任务是针对用户的问题和要求提供适当的答复和支持。# 可用工具";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action:\s*([a-zA-Z0-9_]+).*?Action Input:\s*(.*)")
        .expect("action pattern is valid")
});

/// Named tool rendering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolFormat {
    /// ReAct-style `Action:` / `Action Input:` prompt.
    #[default]
    Default,
    /// GLM-4 function-calling prompt.
    Glm4,
}

impl FromStr for ToolFormat {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ToolFormat::Default),
            "glm4" => Ok(ToolFormat::Glm4),
            other => Err(TemplateError::InvalidFormatter(format!(
                "unknown tool format: {other}"
            ))),
        }
    }
}

impl ToolFormat {
    /// Render a JSON tool manifest. Empty or malformed manifests render `""`.
    pub fn render(self, manifest: &str) -> String {
        match self {
            ToolFormat::Default => serde_json::from_str::<Vec<ToolDefinition>>(manifest)
                .map(|tools| render_default(&tools))
                .unwrap_or_default(),
            ToolFormat::Glm4 => serde_json::from_str::<Vec<Value>>(manifest)
                .map(|tools| render_glm4(&tools))
                .unwrap_or_default(),
        }
    }

    /// Recognize a function call in model output. `None` means the content
    /// is a plain reply.
    pub fn extract(self, content: &str) -> Option<FunctionCall> {
        match self {
            ToolFormat::Default => extract_default(content),
            ToolFormat::Glm4 => extract_glm4(content),
        }
    }
}

fn render_default(tools: &[ToolDefinition]) -> String {
    if tools.is_empty() {
        return String::new();
    }

    let mut tool_text = String::new();
    let mut tool_names = Vec::with_capacity(tools.len());
    for tool in tools {
        let required = tool.required();
        let mut args = String::new();
        if let Some(properties) = tool
            .parameters
            .get("properties")
            .and_then(Value::as_object)
        {
            for (name, param) in properties {
                let kind = param.get("type").and_then(Value::as_str).unwrap_or("");
                let desc = param
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                let required = if required.contains(&name.as_str()) {
                    ", required"
                } else {
                    ""
                };
                let choices = match param.get("enum").and_then(Value::as_array) {
                    Some(values) if !values.is_empty() => format!(
                        ", should be one of [{}]",
                        values.iter().map(plain).collect::<Vec<_>>().join(", ")
                    ),
                    _ => String::new(),
                };
                let items = match param.get("items") {
                    Some(items) if !is_empty_json(items) => format!(
                        ", where each item should be {}",
                        items.get("type").and_then(Value::as_str).unwrap_or("")
                    ),
                    _ => String::new(),
                };
                args.push_str(&format!(
                    "  - {name} ({kind}{required}): {desc}{choices}{items}\n"
                ));
            }
        }

        tool_text.push_str(&format!(
            "> Tool Name: {}\nTool Description: {}\nTool Args:\n{}\n",
            tool.name, tool.description, args
        ));
        tool_names.push(tool.name.as_str());
    }

    format!(
        "{TOOL_SYSTEM_PROMPT_HEAD}{tool_text}Use the following format if using a tool:\n```\n\
         Action: tool name (one of [{}]).\n\
         Action Input: the input to the tool{JSON_FORMAT_PROMPT}.\n```\n",
        tool_names.join(", ")
    )
}

fn render_glm4(tools: &[Value]) -> String {
    if tools.is_empty() {
        return String::new();
    }

    let mut tool_text = String::new();
    for tool in tools {
        let name = tool.get("name").and_then(Value::as_str).unwrap_or("");
        tool_text.push_str(&format!(
            "\n\n## {name}\n\n{}\n在调用上述函数时，请使用 Json 格式表示调用的参数。",
            to_json_indent4(tool)
        ));
    }
    format!("{GLM4_TOOL_PROMPT}{tool_text}")
}

fn extract_default(content: &str) -> Option<FunctionCall> {
    let captures = ACTION_RE.captures(content)?;
    let name = captures.get(1)?.as_str().trim().to_string();
    let input = captures
        .get(2)?
        .as_str()
        .trim()
        .trim_matches('"')
        .trim_matches('`');
    let arguments: Value = serde_json::from_str(input).ok()?;
    Some(FunctionCall {
        name,
        arguments: to_json_spaced(&arguments),
    })
}

fn extract_glm4(content: &str) -> Option<FunctionCall> {
    let lines: Vec<&str> = content.trim().split('\n').collect();
    let [name, input] = lines.as_slice() else {
        return None;
    };
    let arguments: Value = serde_json::from_str(input.trim()).ok()?;
    Some(FunctionCall {
        name: name.trim().to_string(),
        arguments: to_json_spaced(&arguments),
    })
}

/// Strings render without quotes, everything else as JSON.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

fn to_json_indent4(value: &Value) -> String {
    to_json_with(value, serde_json::ser::PrettyFormatter::with_indent(b"    "))
}

/// Single-line JSON with `", "` and `": "` separators, the layout function
/// calls take in training data.
pub(crate) fn to_json_spaced(value: &Value) -> String {
    to_json_with(value, SpacedFormatter)
}

fn to_json_with<F: Formatter>(value: &Value, formatter: F) -> String {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
