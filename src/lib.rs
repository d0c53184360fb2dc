pub mod ai;
pub mod chat;
pub mod config;

pub use ai::{Credential, LlmError, ProviderKind, Role, Turn};
pub use chat::ChatBot;
pub use config::ChatConfig;
