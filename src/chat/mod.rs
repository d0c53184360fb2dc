pub mod bot;
pub mod format;

pub use bot::ChatBot;
pub use format::{estimate_tokens, render_markdown};
