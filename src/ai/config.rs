use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = ["OPENAI_API_KEY", "CUSTOM_OPENAI_API_KEY"]
            .into_iter()
            .find_map(|name| env::var(name).ok().filter(|k| !k.trim().is_empty()))?;
        let timeout_secs = crate::config::parse_env_or("OPENAI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        Some(Self {
            api_key,
            base_url: env::var("OPENAI_COMPATIBLE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Full chat-completions URL derived from the configured base.
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
