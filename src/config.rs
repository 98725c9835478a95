use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::ai::config::AiConfig;
use crate::api::ApiConfig;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 600;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
pub const DEFAULT_MARKUP_PERCENT: u32 = 15;
pub const DEFAULT_PRODUCT_MARKUP_PERCENT: u32 = 20;
pub const DEFAULT_BRAND: &str = "MIX";

/// Settings that shape the instructions sent to the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptConfig {
    /// Markup for the chat bot's single and combo listings.
    pub markup_percent: u32,
    /// Markup for the HTTP endpoint's default product listing.
    pub product_markup_percent: u32,
    pub brand: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            markup_percent: DEFAULT_MARKUP_PERCENT,
            product_markup_percent: DEFAULT_PRODUCT_MARKUP_PERCENT,
            brand: DEFAULT_BRAND.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub bot_token: Option<String>,
    pub app_url: Option<String>,
    pub keep_alive_interval: Duration,
    pub session_ttl: Duration,
    pub prompts: PromptConfig,
    pub api: ApiConfig,
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port = parse_env_or("PORT", DEFAULT_PORT);
        let bind_addr = match env::var("BIND_ADDR") {
            Ok(addr) => addr.parse().unwrap_or_else(|err| {
                tracing::warn!(%addr, error = %err, "Invalid BIND_ADDR, using default");
                SocketAddr::from(([0, 0, 0, 0], port))
            }),
            Err(_) => SocketAddr::from(([0, 0, 0, 0], port)),
        };

        let prompts = PromptConfig {
            markup_percent: parse_env_or("PRICE_MARKUP_PERCENT", DEFAULT_MARKUP_PERCENT),
            product_markup_percent: parse_env_or(
                "PRODUCT_MARKUP_PERCENT",
                DEFAULT_PRODUCT_MARKUP_PERCENT,
            ),
            brand: env::var("PRODUCT_BRAND").unwrap_or_else(|_| DEFAULT_BRAND.to_string()),
        };

        let api = ApiConfig {
            rate_limit_per_second: parse_env_opt("API_RATE_LIMIT_PER_SECOND"),
            auth_token: non_empty_var("API_TOKEN"),
        };

        Self {
            bind_addr,
            bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
            app_url: non_empty_var("APP_URL").map(|url| url.trim_end_matches('/').to_string()),
            keep_alive_interval: Duration::from_secs(parse_env_or(
                "KEEP_ALIVE_INTERVAL_SECS",
                DEFAULT_KEEP_ALIVE_SECS,
            )),
            session_ttl: Duration::from_secs(parse_env_or(
                "SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )),
            prompts,
            api,
            ai: AiConfig::from_env(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read a numeric variable, logging and falling back on parse errors.
pub(crate) fn parse_env_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    parse_env_opt(name).unwrap_or(default)
}

fn parse_env_opt<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring invalid numeric setting");
            None
        }
    }
}
