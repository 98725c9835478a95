use anyhow::Result;
use teloxide::{prelude::*, types::ChatId};

use crate::ai::{FormatMode, Formatter};
use crate::messages::{format_error, DETAILS_SAVED_ASK_URLS, DONE, EMPTY_RESULT, FORMATTING_DISABLED};
use crate::session::{Advance, SessionStore};
use crate::utils::send_typing;

use super::keyboard::main_menu;

/// Feed a plain text message into the sender's session.
pub async fn handle_text(
    bot: Bot,
    msg: Message,
    sessions: SessionStore,
    formatter: Option<Formatter>,
) -> Result<()> {
    let (Some(text), Some(user)) = (msg.text(), msg.from.as_ref()) else {
        return Ok(());
    };

    match sessions.advance(user.id, text).await {
        Advance::Ignore => {
            tracing::trace!(user_id = user.id.0, "No active session, ignoring text");
        }
        Advance::NeedUrls => {
            bot.send_message(msg.chat.id, DETAILS_SAVED_ASK_URLS).await?;
        }
        Advance::Ready { mode, input } => {
            tracing::info!(chat_id = msg.chat.id.0, user_id = user.id.0, %mode, "Formatting product");
            run_formatter(&bot, msg.chat.id, formatter.as_ref(), mode, &input).await?;
        }
    }
    Ok(())
}

async fn run_formatter(
    bot: &Bot,
    chat_id: ChatId,
    formatter: Option<&Formatter>,
    mode: FormatMode,
    input: &str,
) -> Result<()> {
    let reply = match formatter {
        Some(formatter) => {
            send_typing(bot, chat_id).await;
            match formatter.format(mode, input).await {
                Ok(text) if text.is_empty() => EMPTY_RESULT.to_string(),
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(chat_id = chat_id.0, %mode, error = %err, "Model call failed");
                    format_error(&err)
                }
            }
        }
        None => FORMATTING_DISABLED.to_string(),
    };

    if let Err(err) = bot.send_message(chat_id, reply).await {
        tracing::warn!(chat_id = chat_id.0, %mode, error = %err, "Could not deliver result");
        bot.send_message(chat_id, format_error(&anyhow::Error::from(err))).await?;
    }
    bot.send_message(chat_id, DONE)
        .reply_markup(main_menu())
        .await?;
    Ok(())
}
