pub mod common;
pub mod config;
pub mod formatter;
pub mod prompts;

pub use formatter::{FormatMode, Formatter};
