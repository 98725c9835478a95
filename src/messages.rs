//! Shared text sent by the bot.
//!
//! Keep all user-facing strings in this module so they stay in one place and are
//! easy to update or translate.

use crate::ai::FormatMode;

pub const DASHBOARD_TEXT: &str = "🌟 <b>Product Formatter Dashboard</b>\nChoose a tool:";

pub const HELP_TEXT: &str = "❓ <b>How to use this bot</b>\n\n\
     👕 <b>Single PC mode</b>\n\
     1. Send the product details.\n\
     2. Send the image or video URLs (or 'none').\n\
     Result: one pipe-separated line for a single-piece listing.\n\n\
     📦 <b>Combo pack mode</b>\n\
     1. Send the product details.\n\
     2. Send the URLs.\n\
     Result: one pipe-separated combo line that also mentions the single-piece price.\n\n\
     📸 <b>Instagram mode</b>\n\
     Send everything in ONE message.\n\
     Result: a caption ready to post.\n\n\
     <b>Commands:</b>\n\
     /start or /menu - Show the main menu.\n\
     /help - Show this text.\n\
     /info - Show build information.";

pub const SELECT_TOOL: &str = "Select a tool:";
pub const DETAILS_SAVED_ASK_URLS: &str = "✅ Details saved.\nStep 2/2: Paste URLs (or 'none'):";
pub const INSTAGRAM_PROMPT_TEXT: &str = "📸 <b>Instagram Mode</b>\nPaste all details here:";
pub const DONE: &str = "Done!";
pub const EMPTY_RESULT: &str = "The model returned an empty answer. Please try again.";
pub const FORMATTING_DISABLED: &str = "Formatting is disabled: no model API key is configured.";

pub const MENU_SINGLE: &str = "👕 Single PC (Pipe)";
pub const MENU_COMBO: &str = "📦 Combo Pack (Pipe)";
pub const MENU_INSTAGRAM: &str = "📸 Instagram Post";
pub const MENU_RESET: &str = "🧹 Reset";

/// Text shown when a user picks a mode from the menu.
pub fn mode_started(mode: FormatMode) -> String {
    match mode {
        FormatMode::Instagram => INSTAGRAM_PROMPT_TEXT.to_string(),
        other => format!(
            "🛠 <b>{} Mode</b>\nStep 1/2: Paste Product Details:",
            other.as_str().to_uppercase()
        ),
    }
}

pub fn format_error(err: &anyhow::Error) -> String {
    format!("Error: {err}")
}
