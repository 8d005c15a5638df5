use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message identifier. Fresh ids are derived from the creation time in
/// milliseconds and are strictly increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Own,         // Written by the local user
    Counterpart, // Simulated reply from a contact
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub origin: Origin,
}

impl Message {
    pub fn is_own(&self) -> bool {
        self.origin == Origin::Own
    }

    /// Short local time label shown next to the message bubble.
    pub fn time_label(&self) -> String {
        self.timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M")
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub status: ContactStatus,
}

impl Contact {
    pub fn new(id: &str, name: &str, status: ContactStatus) -> Self {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    Online,
    Away,
    Offline,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Online => "online",
            ContactStatus::Away => "away",
            ContactStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed contact directory. Contacts never change at runtime.
pub fn default_contacts() -> Vec<Contact> {
    vec![
        Contact::new("alice", "Alice Johnson", ContactStatus::Online),
        Contact::new("bob", "Bob Smith", ContactStatus::Away),
        Contact::new("carol", "Carol Davis", ContactStatus::Offline),
    ]
}

/// Hands out strictly increasing ids based on wall-clock milliseconds.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: u64,
}

impl MessageIdGenerator {
    /// Starts after `last`, so ids already handed out (e.g. seed messages)
    /// are never reused.
    pub fn starting_after(last: MessageId) -> Self {
        MessageIdGenerator { last: last.0 }
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> MessageId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        MessageId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_id_generator_same_millisecond() {
        let now = Utc.timestamp_millis_opt(1_650_000_000_000).unwrap();
        let mut ids = MessageIdGenerator::default();

        let first = ids.next_id(now);
        let second = ids.next_id(now);
        let third = ids.next_id(now);

        assert_eq!(first, MessageId(1_650_000_000_000));
        assert_eq!(second, MessageId(1_650_000_000_001));
        assert_eq!(third, MessageId(1_650_000_000_002));
    }

    #[test]
    fn test_id_generator_follows_clock() {
        let mut ids = MessageIdGenerator::starting_after(MessageId(3));
        let early = Utc.timestamp_millis_opt(1_000).unwrap();
        let later = Utc.timestamp_millis_opt(5_000).unwrap();

        assert_eq!(ids.next_id(early), MessageId(1_000));
        assert_eq!(ids.next_id(later), MessageId(5_000));
        // A clock going backwards never produces a smaller id
        assert_eq!(ids.next_id(early), MessageId(5_001));
    }

    #[test]
    fn test_id_generator_skips_seed_ids() {
        let mut ids = MessageIdGenerator::starting_after(MessageId(3));
        let epoch = Utc.timestamp_millis_opt(0).unwrap();
        assert_eq!(ids.next_id(epoch), MessageId(4));
    }

    #[test]
    fn test_contact_status_labels() {
        let contacts = default_contacts();
        let labels: Vec<&str> = contacts.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(labels, vec!["online", "away", "offline"]);
        assert_eq!(ContactStatus::Away.to_string(), "away");
    }

    #[test]
    fn test_message_origin() {
        let msg = Message {
            id: MessageId(1),
            text: "Hello, world!".to_string(),
            author: "You".to_string(),
            timestamp: Utc::now(),
            origin: Origin::Own,
        };
        assert!(msg.is_own());
        assert_eq!(msg.time_label().len(), 5);
    }
}
