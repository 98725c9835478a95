use anyhow::Result;
use dotenvy::dotenv;
use teloxide::{dispatching::UpdateHandler, prelude::*};

pub mod ai;
pub mod api;
pub mod commands;
pub mod config;
pub mod handlers;
pub mod keep_alive;
pub mod messages;
pub mod session;
pub mod system_info;
pub mod text_utils;
mod utils;

pub use ai::{FormatMode, Formatter};
pub use api::{router as api_router, ApiConfig, ApiState};
pub use commands::Command;
pub use config::{Config, PromptConfig};
pub use handlers::{callback_handler, handle_text};
pub use session::{Session, SessionStore};

/// Update routing for the bot: menu buttons, commands, then free text.
///
/// Expects `SessionStore` and `Option<Formatter>` among the dependencies.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(
                    |bot: Bot,
                     msg: Message,
                     cmd: Command,
                     sessions: SessionStore,
                     formatter: Option<Formatter>| async move {
                        cmd.dispatch(bot, msg, sessions, formatter).await
                    },
                ))
                .branch(dptree::endpoint(handle_text)),
        )
}

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    let formatter = match config.ai.clone() {
        Some(ai) => Some(Formatter::new(ai, config.prompts.clone())?),
        None => {
            tracing::warn!("OPENAI_API_KEY not set, formatting is disabled");
            None
        }
    };

    tracing::info!(
        info = %system_info::get_system_info(formatter.as_ref().map(Formatter::model)),
        "Starting product formatter..."
    );

    let app = api::router(
        ApiState {
            formatter: formatter.clone(),
        },
        config.api.clone(),
    );
    let server = tokio::spawn(api::serve(config.bind_addr, app));

    if let Some(app_url) = config.app_url.clone() {
        keep_alive::spawn(app_url, config.keep_alive_interval);
    }

    match config.bot_token.clone() {
        Some(token) => {
            let bot = Bot::new(token);
            commands::register_commands(&bot).await;
            let sessions = SessionStore::new(config.session_ttl);

            let mut dispatcher = Dispatcher::builder(bot, schema())
                .dependencies(dptree::deps![sessions, formatter])
                .enable_ctrlc_handler()
                .build();

            tokio::select! {
                _ = dispatcher.dispatch() => tracing::info!("Bot dispatcher stopped"),
                res = server => res??,
            }
        }
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN not set, chat bot is disabled");
            tokio::select! {
                res = server => res??,
                _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
            }
        }
    }

    Ok(())
}
