use anyhow::Result;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::ai::Formatter;
use crate::handlers::{help, show_system_info, start};
use crate::session::SessionStore;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "open the dashboard.")]
    Start,
    #[command(description = "show the main menu.")]
    Menu,
    #[command(description = "how to use the bot.")]
    Help,
    #[command(description = "show build information.")]
    Info,
}

impl Command {
    pub async fn dispatch(
        self,
        bot: Bot,
        msg: Message,
        sessions: SessionStore,
        formatter: Option<Formatter>,
    ) -> Result<()> {
        match self {
            Command::Start | Command::Menu => start(bot, msg, sessions).await?,
            Command::Help => help(bot, msg).await?,
            Command::Info => show_system_info(bot, msg, formatter).await?,
        }
        Ok(())
    }
}

/// Publish the command list so clients show it in the command menu.
pub async fn register_commands(bot: &Bot) {
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = %err, "Failed to register bot commands");
    }
}
