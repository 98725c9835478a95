use anyhow::Result;
use teloxide::{prelude::*, types::ParseMode};

use crate::ai::Formatter;
use crate::messages::{DASHBOARD_TEXT, HELP_TEXT};
use crate::session::SessionStore;
use crate::system_info::get_system_info;

use super::keyboard::main_menu;

/// Reset the sender's session and show the main menu.
pub async fn start(bot: Bot, msg: Message, sessions: SessionStore) -> Result<()> {
    if let Some(user) = msg.from.as_ref() {
        sessions.clear(user.id).await;
    }
    tracing::debug!(chat_id = msg.chat.id.0, "Showing dashboard");
    bot.send_message(msg.chat.id, DASHBOARD_TEXT)
        .parse_mode(ParseMode::Html)
        .reply_markup(main_menu())
        .await?;
    Ok(())
}

pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, HELP_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub async fn show_system_info(bot: Bot, msg: Message, formatter: Option<Formatter>) -> Result<()> {
    tracing::debug!(chat_id = msg.chat.id.0, "Showing system info");
    let model = formatter.as_ref().map(Formatter::model);
    bot.send_message(msg.chat.id, get_system_info(model)).await?;
    Ok(())
}
