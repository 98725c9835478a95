pub mod callback;
pub mod keyboard;
pub mod menu;
pub mod text;

pub use callback::callback_handler;
pub use keyboard::{main_menu, MenuAction};
pub use menu::{help, show_system_info, start};
pub use text::handle_text;
