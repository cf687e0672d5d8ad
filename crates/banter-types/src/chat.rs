//! Conversation and message entities.
//!
//! Both types are produced by the chat repository from backend documents;
//! consumers read them but never mutate them in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation between two or more members.
///
/// `members` is non-empty and includes the creating user's identifier.
/// `last_message` and `last_message_at` are best-effort denormalizations
/// maintained by the backend document; either may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Server-assigned document id.
    pub id: String,
    /// Member identifiers (user ids or emails, as stored by the backend).
    pub members: Vec<String>,
    /// Preview of the most recent message, if the backend recorded one.
    pub last_message: Option<String>,
    /// Timestamp of the most recent message. Conversations sort descending
    /// by this field; a missing value sorts after every present one.
    pub last_message_at: Option<DateTime<Utc>>,
}

/// A single message within a conversation.
///
/// Immutable once constructed. `sent_at` is the server-side creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned document id.
    pub id: String,
    /// Id of the conversation this message belongs to.
    pub conversation_id: String,
    /// Account id of the sender.
    pub sender_id: String,
    /// Message body.
    pub text: String,
    /// Server-side creation timestamp.
    pub sent_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn conversation_missing_timestamp_sorts_after_present_one() {
        let dated = Conversation {
            id: "c1".to_string(),
            members: vec!["a@x.com".to_string()],
            last_message: None,
            last_message_at: Some(Utc.with_ymd_and_hms(2025, 1, 14, 10, 0, 0).unwrap()),
        };
        let undated = Conversation {
            id: "c2".to_string(),
            members: vec!["b@x.com".to_string()],
            last_message: None,
            last_message_at: None,
        };

        let mut list = vec![undated.clone(), dated.clone()];
        list.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        assert_eq!(list[0].id, dated.id);
        assert_eq!(list[1].id, undated.id);
    }

    #[test]
    fn message_serde_round_trip() {
        let message = Message {
            id: "m1".to_string(),
            conversation_id: "c1".to_string(),
            sender_id: "usr_1".to_string(),
            text: "hi".to_string(),
            sent_at: Utc.with_ymd_and_hms(2025, 1, 14, 10, 0, 0).unwrap(),
        };
        let json = serde_json::to_string(&message).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, message);
    }
}
