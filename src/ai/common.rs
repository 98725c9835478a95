use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, trace, warn};

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Build a chat-completions body with one system and one user message.
pub fn build_text_chat_body(model: &str, system: &str, user: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
    })
}

/// Send a prepared request with bearer auth and fail on non-2xx statuses.
pub async fn send_openai_request(
    api_key: &str,
    builder: reqwest::RequestBuilder,
) -> Result<reqwest::Response> {
    let resp = builder.bearer_auth(api_key).send().await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let err_text = resp.text().await.unwrap_or_default();
        warn!(%status, "model API error");
        return Err(anyhow!("model API error {status}: {err_text}"));
    }

    Ok(resp)
}

/// Extract the first choice's message content from a raw response body.
pub fn parse_chat_content(raw: &str) -> Result<String> {
    let chat: ChatResponse = serde_json::from_str(raw)?;
    chat.choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("missing chat choice"))?
        .message
        .content
        .ok_or_else(|| anyhow!("missing chat content"))
}

#[instrument(level = "trace", skip(client, api_key, body))]
pub async fn request_completion(
    client: &reqwest::Client,
    api_key: &str,
    body: &Value,
    url: &str,
) -> Result<String> {
    debug!(url, "sending chat completion request");

    let builder = client.post(url).json(body);
    let resp = send_openai_request(api_key, builder).await?;

    let raw = resp.text().await?;
    let snippet: String = raw.chars().take(200).collect();
    debug!(snippet = %snippet, "chat response body");
    trace!(raw = %raw, "chat response");
    parse_chat_content(&raw)
}
