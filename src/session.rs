// Mock chat session
// Holds the message list and the selected contact. Every accepted submission
// schedules one simulated reply on a tokio timer.

use chrono::{Duration as ChronoDuration, Utc};
use log::{debug, info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::models::{default_contacts, Contact, Message, MessageId, MessageIdGenerator, Origin};

const SEED_COUNTERPART: &str = "Alice Johnson";
const UNKNOWN_AUTHOR: &str = "Unknown";

struct SessionState {
    messages: Vec<Message>,
    selected: String,
    draft: String,
    ids: MessageIdGenerator,
    rng: StdRng,
    // Submission id -> reply task that has not fired yet
    pending: HashMap<MessageId, JoinHandle<()>>,
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory chat session with a simulated counterpart.
///
/// Messages are append-only and shared by all contacts; selecting another
/// contact only changes who the next reply is attributed to. Replies are
/// resolved against the contact selected when the timer fires.
///
/// `submit` spawns tokio tasks and must be called from within a runtime.
pub struct MockChatSession {
    id: Uuid,
    state: Arc<Mutex<SessionState>>,
    contacts: Arc<Vec<Contact>>,
    replies: Arc<Vec<String>>,
    self_label: String,
    delay_min_ms: u64,
    delay_jitter_ms: u64,
    reply_tx: mpsc::Sender<Message>,
}

impl MockChatSession {
    /// Create a seeded session. The receiver yields every reply as it lands.
    pub fn new(config: ChatConfig) -> Result<(Self, mpsc::Receiver<Message>)> {
        config.validate()?;

        let messages = seed_messages(&config.self_label);
        let last_seed = messages.last().map(|m| m.id).unwrap_or(MessageId(0));
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (reply_tx, reply_rx) = mpsc::channel(config.reply_channel_capacity);

        let state = SessionState {
            messages,
            selected: config.initial_contact.clone(),
            draft: String::new(),
            ids: MessageIdGenerator::starting_after(last_seed),
            rng,
            pending: HashMap::new(),
        };

        let session = MockChatSession {
            id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(state)),
            contacts: Arc::new(default_contacts()),
            replies: Arc::new(config.replies),
            self_label: config.self_label,
            delay_min_ms: config.reply_delay_min_ms,
            delay_jitter_ms: config.reply_delay_jitter_ms,
            reply_tx,
        };

        info!(
            "Chat session {} started with contact '{}' (seeded: {})",
            session.id,
            config.initial_contact,
            config.seed.is_some()
        );
        Ok((session, reply_rx))
    }

    pub fn session_id(&self) -> Uuid {
        self.id
    }

    /// Append a message written by the local user and schedule one reply.
    ///
    /// Blank (whitespace-only) text is ignored and `None` is returned. The
    /// text is stored as typed, without trimming.
    pub fn submit(&self, text: &str) -> Option<MessageId> {
        if text.trim().is_empty() {
            debug!("Ignoring blank submission");
            return None;
        }

        let mut state = lock(&self.state);
        let now = Utc::now();
        let id = state.ids.next_id(now);
        state.messages.push(Message {
            id,
            text: text.to_string(),
            author: self.self_label.clone(),
            timestamp: now,
            origin: Origin::Own,
        });
        state.draft.clear();

        let delay = self.pick_delay(&mut state.rng);
        let handle = self.spawn_reply(id, delay);
        state.pending.insert(id, handle);

        info!("Message {} submitted, reply scheduled in {}ms", id, delay.as_millis());
        Some(id)
    }

    pub fn set_draft(&self, text: &str) {
        let mut state = lock(&self.state);
        state.draft.clear();
        state.draft.push_str(text);
    }

    pub fn draft(&self) -> String {
        lock(&self.state).draft.clone()
    }

    /// Submit whatever is in the input buffer
    pub fn submit_draft(&self) -> Option<MessageId> {
        let draft = lock(&self.state).draft.clone();
        self.submit(&draft)
    }

    /// Switch the active contact. The message history is left untouched.
    pub fn select_contact(&self, contact_id: &str) -> Result<()> {
        if !self.contacts.iter().any(|c| c.id == contact_id) {
            warn!("Attempted to select unknown contact '{}'", contact_id);
            return Err(ChatError::UnknownContact(contact_id.to_string()));
        }

        let mut state = lock(&self.state);
        if state.selected != contact_id {
            info!("Switched active contact from '{}' to '{}'", state.selected, contact_id);
            state.selected = contact_id.to_string();
        }
        Ok(())
    }

    pub fn selected_contact_id(&self) -> String {
        lock(&self.state).selected.clone()
    }

    pub fn selected_contact(&self) -> Option<Contact> {
        let selected = self.selected_contact_id();
        self.contacts.iter().find(|c| c.id == selected).cloned()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Snapshot of the message list in display order
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.state).messages.clone()
    }

    pub fn message_count(&self) -> usize {
        lock(&self.state).messages.len()
    }

    /// Number of replies scheduled but not yet delivered
    pub fn pending_replies(&self) -> usize {
        lock(&self.state).pending.len()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.pending_replies() > 0
    }

    /// Cancel every reply that has not fired yet. Returns how many were cancelled.
    pub fn shutdown(&self) -> usize {
        let mut state = lock(&self.state);
        let cancelled = state.pending.len();
        for (submission, handle) in state.pending.drain() {
            debug!("Cancelling pending reply to message {}", submission);
            handle.abort();
        }
        if cancelled > 0 {
            info!("Chat session {} cancelled {} pending replies", self.id, cancelled);
        }
        cancelled
    }

    fn pick_delay(&self, rng: &mut StdRng) -> Duration {
        let jitter = if self.delay_jitter_ms == 0 {
            0
        } else {
            rng.gen_range(0..self.delay_jitter_ms)
        };
        Duration::from_millis(self.delay_min_ms.saturating_add(jitter))
    }

    fn spawn_reply(&self, submission: MessageId, delay: Duration) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let contacts = Arc::clone(&self.contacts);
        let replies = Arc::clone(&self.replies);
        let reply_tx = self.reply_tx.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let reply = {
                let mut state = lock(&state);
                // Gone from the map means the session cancelled us while we
                // were waiting for the lock
                if state.pending.remove(&submission).is_none() {
                    debug!("Reply to message {} was cancelled", submission);
                    return;
                }

                let text = replies.choose(&mut state.rng).cloned().unwrap_or_default();
                let author = contacts
                    .iter()
                    .find(|c| c.id == state.selected)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
                let now = Utc::now();
                let id = state.ids.next_id(now);

                let reply = Message {
                    id,
                    text,
                    author,
                    timestamp: now,
                    origin: Origin::Counterpart,
                };
                state.messages.push(reply.clone());
                reply
            };

            debug!("Reply {} from {} delivered for message {}", reply.id, reply.author, submission);
            match reply_tx.try_send(reply) {
                Ok(_) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("Reply channel full, UI will pick up message from the list")
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Reply receiver dropped")
                }
            }
        })
    }
}

impl Drop for MockChatSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn seed_messages(self_label: &str) -> Vec<Message> {
    let now = Utc::now();
    let seed = |id: u64, minutes_ago: i64, author: &str, origin: Origin, text: &str| Message {
        id: MessageId(id),
        text: text.to_string(),
        author: author.to_string(),
        timestamp: now - ChronoDuration::minutes(minutes_ago),
        origin,
    };

    vec![
        seed(1, 5, SEED_COUNTERPART, Origin::Counterpart, "Hey there! Welcome to ChatVerse! 👋"),
        seed(2, 4, self_label, Origin::Own, "Thanks! This looks amazing. Love the design!"),
        seed(
            3,
            3,
            SEED_COUNTERPART,
            Origin::Counterpart,
            "Right? The real-time messaging works perfectly. Try sending a message!",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (MockChatSession, mpsc::Receiver<Message>) {
        MockChatSession::new(ChatConfig::default().with_seed(42)).unwrap()
    }

    #[test]
    fn test_seed_messages() {
        let (session, _rx) = seeded();
        let messages = session.messages();

        assert_eq!(messages.len(), 3);
        let ids: Vec<u64> = messages.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!messages[0].is_own());
        assert!(messages[1].is_own());
        assert_eq!(messages[1].author, "You");
        assert!(messages[0].timestamp < messages[1].timestamp);
        assert!(messages[1].timestamp < messages[2].timestamp);
        assert_eq!(session.selected_contact_id(), "alice");
    }

    #[test]
    fn test_blank_submission_needs_no_runtime() {
        let (session, _rx) = seeded();
        assert_eq!(session.submit(""), None);
        assert_eq!(session.submit(" \t\n "), None);
        assert_eq!(session.message_count(), 3);
        assert!(!session.is_awaiting_reply());
    }

    #[test]
    fn test_select_unknown_contact() {
        let (session, _rx) = seeded();
        let result = session.select_contact("mallory");
        assert!(matches!(result, Err(ChatError::UnknownContact(_))));
        assert_eq!(session.selected_contact_id(), "alice");
    }

    #[test]
    fn test_pick_delay_bounds() {
        let (session, _rx) = seeded();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let delay = session.pick_delay(&mut rng);
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay < Duration::from_millis(3000));
        }
    }

    #[test]
    fn test_pick_delay_without_jitter() {
        let config = ChatConfig {
            reply_delay_min_ms: 250,
            reply_delay_jitter_ms: 0,
            ..ChatConfig::default()
        };
        let (session, _rx) = MockChatSession::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(session.pick_delay(&mut rng), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_draft_cleared_on_submit() {
        let (session, _rx) = seeded();
        session.set_draft("hello");
        assert_eq!(session.draft(), "hello");

        let id = session.submit_draft();
        assert!(id.is_some());
        assert_eq!(session.draft(), "");
        assert_eq!(session.message_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_draft_kept() {
        let (session, _rx) = seeded();
        session.set_draft("   ");
        assert_eq!(session.submit_draft(), None);
        assert_eq!(session.draft(), "   ");
    }
}
