// Common test utilities for integration tests

use std::sync::Once;
use std::time::Duration;

use log::LevelFilter;
use tokio::sync::mpsc;

use chatverse::{models::Message, ChatConfig, MockChatSession};

static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

/// Session with default delays and a fixed seed
pub fn seeded_session(seed: u64) -> (MockChatSession, mpsc::Receiver<Message>) {
    setup_logging();
    MockChatSession::new(ChatConfig::default().with_seed(seed)).expect("default config is valid")
}

/// Upper bound on how long any reply can take with the default config
pub fn reply_window() -> Duration {
    ChatConfig::default().max_reply_delay()
}
