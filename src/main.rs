#![deny(dead_code)]
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};
use std::io;
use std::path::PathBuf;
use tokio::sync::mpsc;

mod ui;
mod utils;

use crate::ui::{ChatUI, UiAction};
use chatverse::models::Message;
use chatverse::pages::Page;
use chatverse::{ChatConfig, MockChatSession};

/// Command line arguments for ChatVerse
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ChatVerse: a terminal chat demo with simulated replies.",
    long_about = "ChatVerse is a local chat demo. Messages stay in memory and every message \
    you send gets a canned reply from the selected contact after a short random delay.\n\n\
    Use -h or --help to see all options."
)]
struct Args {
    /// JSON config file (defaults to <config dir>/chatverse/config.json when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for reply selection and delays, for reproducible sessions
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    #[arg(long, value_name = "PATH", default_value = "chatverse.log")]
    log_file: PathBuf,

    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    utils::setup_logging(&args.log_file, args.log_level)
        .with_context(|| format!("Failed to open log file {}", args.log_file.display()))?;
    info!("ChatVerse starting up");
    info!("System information: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    let mut config = ChatConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let (session, mut reply_rx) = MockChatSession::new(config)?;

    let mut terminal = ui::setup_terminal()?;
    let mut chat_ui = ChatUI::new(&session);

    let result = run_main_loop(&mut chat_ui, &mut terminal, &session, &mut reply_rx);

    // Restore the terminal even when the loop failed
    ui::restore_terminal(terminal)?;
    session.shutdown();
    result?;

    println!("Chat session ended.");
    Ok(())
}

/// Run the main event loop
fn run_main_loop(
    chat_ui: &mut ChatUI,
    terminal: &mut ui::Terminal<ui::CrosstermBackend<io::Stdout>>,
    session: &MockChatSession,
    reply_rx: &mut mpsc::Receiver<Message>,
) -> Result<()> {
    loop {
        terminal.draw(|f| chat_ui.draw(f, session))?;

        chat_ui.clean_reply_notifications(5);

        if let Some(UiAction::Quit) = chat_ui.handle_input(session)? {
            info!("Quit requested");
            return Ok(());
        }

        // Replies are already in the session; the channel only tells us one landed
        while let Ok(reply) = reply_rx.try_recv() {
            debug!("Reply {} from {} arrived", reply.id, reply.author);
            if chat_ui.current_page() != Page::Chat {
                chat_ui.show_reply_notification(&reply);
            }
        }
    }
}
