// Re-export needed modules for testing
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod session;

// Re-export main types for convenience
pub use config::ChatConfig;
pub use error::ChatError;
pub use models::*;
pub use session::MockChatSession;
