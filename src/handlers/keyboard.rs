use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::ai::FormatMode;
use crate::messages::{MENU_COMBO, MENU_INSTAGRAM, MENU_RESET, MENU_SINGLE};

/// Buttons on the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Single,
    Combo,
    Instagram,
    Reset,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::Single,
        MenuAction::Combo,
        MenuAction::Instagram,
        MenuAction::Reset,
    ];

    pub fn callback_data(self) -> &'static str {
        match self {
            MenuAction::Single => "mode_single",
            MenuAction::Combo => "mode_combo",
            MenuAction::Instagram => "mode_instagram",
            MenuAction::Reset => "reset",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Single => MENU_SINGLE,
            MenuAction::Combo => MENU_COMBO,
            MenuAction::Instagram => MENU_INSTAGRAM,
            MenuAction::Reset => MENU_RESET,
        }
    }

    pub fn from_callback(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.callback_data() == data)
    }

    /// Formatting mode selected by this button, if any.
    pub fn mode(self) -> Option<FormatMode> {
        match self {
            MenuAction::Single => Some(FormatMode::Single),
            MenuAction::Combo => Some(FormatMode::Combo),
            MenuAction::Instagram => Some(FormatMode::Instagram),
            MenuAction::Reset => None,
        }
    }
}

pub fn build_buttons<T, F, G>(items: &[T], label: F, callback: G) -> Vec<Vec<InlineKeyboardButton>>
where
    F: Fn(&T) -> String,
    G: Fn(&T) -> String,
{
    items
        .iter()
        .map(|item| vec![InlineKeyboardButton::callback(label(item), callback(item))])
        .collect()
}

/// One button per row, in menu order.
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(build_buttons(
        &MenuAction::ALL,
        |a| a.label().to_string(),
        |a| a.callback_data().to_string(),
    ))
}
