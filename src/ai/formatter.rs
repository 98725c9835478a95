use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use tracing::{debug, instrument};

use crate::ai::common::{build_text_chat_body, request_completion};
use crate::ai::config::AiConfig;
use crate::ai::prompts::{combo_prompt, product_prompt, single_prompt, INSTAGRAM_PROMPT};
use crate::config::PromptConfig;
use crate::text_utils::{clean_caption_output, clean_pipe_output};

/// Output style requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatMode {
    Product,
    Single,
    Combo,
    Instagram,
}

impl FormatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatMode::Product => "product",
            FormatMode::Single => "single",
            FormatMode::Combo => "combo",
            FormatMode::Instagram => "instagram",
        }
    }

    /// Strip model noise the way each surface expects: the HTTP listing is
    /// only trimmed, chat listings are forced onto one line, captions keep
    /// their line breaks.
    fn clean(self, raw: &str) -> String {
        match self {
            FormatMode::Product => raw.trim().to_string(),
            FormatMode::Single | FormatMode::Combo => clean_pipe_output(raw),
            FormatMode::Instagram => clean_caption_output(raw),
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(FormatMode::Product),
            "single" => Ok(FormatMode::Single),
            "combo" => Ok(FormatMode::Combo),
            "instagram" => Ok(FormatMode::Instagram),
            other => Err(anyhow!("unknown mode '{other}'")),
        }
    }
}

/// Sends product text to the model and returns the cleaned answer.
#[derive(Clone, Debug)]
pub struct Formatter {
    client: reqwest::Client,
    ai: AiConfig,
    prompts: PromptConfig,
}

impl Formatter {
    pub fn new(ai: AiConfig, prompts: PromptConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(ai.timeout).build()?;
        Ok(Self {
            client,
            ai,
            prompts,
        })
    }

    pub fn model(&self) -> &str {
        &self.ai.model
    }

    pub fn system_prompt(&self, mode: FormatMode) -> String {
        match mode {
            FormatMode::Product => product_prompt(&self.prompts),
            FormatMode::Single => single_prompt(&self.prompts),
            FormatMode::Combo => combo_prompt(&self.prompts),
            FormatMode::Instagram => INSTAGRAM_PROMPT.to_string(),
        }
    }

    #[instrument(level = "debug", skip(self, input), fields(model = %self.ai.model))]
    pub async fn format(&self, mode: FormatMode, input: &str) -> Result<String> {
        let body = build_text_chat_body(&self.ai.model, &self.system_prompt(mode), input);
        let raw = request_completion(&self.client, &self.ai.api_key, &body, &self.ai.chat_url())
            .await?;
        let cleaned = mode.clean(&raw);
        debug!(chars = cleaned.chars().count(), "formatted product text");
        Ok(cleaned)
    }
}
