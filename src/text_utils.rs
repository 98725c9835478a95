use anyhow::{bail, Result};
use serde_json::Value;
use tracing::trace;

/// Text and optional mode pulled out of an HTTP request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestText {
    pub text: String,
    pub mode: Option<String>,
}

/// Normalize line endings and strip surrounding whitespace.
pub fn normalize_input(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}

/// Decode a body as UTF-8, dropping invalid byte sequences.
pub fn decode_lossy_dropping(body: &[u8]) -> String {
    body.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Sniff a request body as a JSON object with a `text` field, falling back
/// to treating the whole body as plain text when it is not JSON at all.
///
/// JSON that is not an object, or whose `text` is present but not a string,
/// is rejected. A missing `text` yields empty text so the caller rejects it
/// the same way as an empty body.
pub fn extract_request_text(body: &[u8]) -> Result<RequestText> {
    let raw = decode_lossy_dropping(body);
    let map = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => bail!("expected a JSON object, got {}", json_kind(&other)),
        Err(_) => {
            trace!("request body treated as plain text");
            return Ok(RequestText {
                text: normalize_input(&raw),
                mode: None,
            });
        }
    };

    trace!("request body parsed as JSON object");
    let text = match map.get("text") {
        None => String::new(),
        Some(Value::String(text)) => normalize_input(text),
        Some(other) => bail!("'text' must be a string, got {}", json_kind(other)),
    };
    let mode = map
        .get("mode")
        .and_then(Value::as_str)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    Ok(RequestText { text, mode })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Join the two chat steps into one model input.
pub fn combine_listing(description: &str, urls: &str) -> String {
    format!("DATA: {description}\nURLS: {urls}")
}

/// Clean a pipe-format answer: literal `\n` sequences, quotes and answer
/// prefixes are dropped so the result stays on one line.
pub fn clean_pipe_output(raw: &str) -> String {
    raw.replace("\\n", " ")
        .replace('"', "")
        .replace("Output:", "")
        .replace("Result:", "")
        .trim()
        .to_string()
}

/// Clean a caption answer: literal `\n` sequences become real line breaks.
pub fn clean_caption_output(raw: &str) -> String {
    raw.replace("\\n", "\n").replace('"', "").trim().to_string()
}
