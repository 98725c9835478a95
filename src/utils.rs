use teloxide::{
    prelude::*,
    types::{ChatAction, ChatId, InlineKeyboardMarkup, MessageId, ParseMode},
};

/// Attempt to edit a message and log a warning on failure.
pub async fn try_edit_message(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: impl Into<String>,
    markup: Option<InlineKeyboardMarkup>,
) {
    let mut request = bot
        .edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::Html);
    if let Some(markup) = markup {
        request = request.reply_markup(markup);
    }
    if let Err(err) = request.await {
        tracing::warn!(
            error = %err,
            chat_id = chat_id.0,
            message_id = message_id.0,
            "Failed to edit message",
        );
    }
}

/// Show the typing indicator while the model works.
pub async fn send_typing(bot: &Bot, chat_id: ChatId) {
    if let Err(err) = bot.send_chat_action(chat_id, ChatAction::Typing).await {
        tracing::warn!(error = %err, chat_id = chat_id.0, "Failed to send typing action");
    }
}
