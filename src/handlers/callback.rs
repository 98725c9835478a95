use anyhow::Result;
use teloxide::prelude::*;

use crate::messages::{mode_started, SELECT_TOOL};
use crate::session::{Session, SessionStore};
use crate::utils::try_edit_message;

use super::keyboard::{main_menu, MenuAction};

/// Handle a main-menu button press.
pub async fn callback_handler(bot: Bot, q: CallbackQuery, sessions: SessionStore) -> Result<()> {
    // Stop the client's spinner before any slower work.
    bot.answer_callback_query(q.id.clone()).await?;

    let user_id = q.from.id;
    let action = q.data.as_deref().and_then(MenuAction::from_callback);

    match action {
        Some(action) => {
            let text = match action.mode() {
                Some(mode) => {
                    tracing::debug!(user_id = user_id.0, %mode, "Mode selected");
                    sessions.set(user_id, Session::start(mode)).await;
                    mode_started(mode)
                }
                None => {
                    tracing::debug!(user_id = user_id.0, "Session reset from menu");
                    sessions.clear(user_id).await;
                    SELECT_TOOL.to_string()
                }
            };
            if let Some(msg) = q.message.as_ref() {
                let markup = (action == MenuAction::Reset).then(main_menu);
                try_edit_message(&bot, msg.chat().id, msg.id(), text, markup).await;
            }
        }
        None => {
            tracing::debug!(user_id = user_id.0, data = ?q.data, "Ignoring unknown callback");
        }
    }

    Ok(())
}
