pub mod prompt;
pub mod providers;
pub mod service;
pub mod types;

pub use providers::LlmProvider;
pub use service::ChatService;
pub use types::{ChatError, ChatMessage, ProviderMessage, ProviderRole, Role};
