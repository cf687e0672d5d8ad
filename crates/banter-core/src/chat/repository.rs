//! Chat repository: conversation and message data access.
//!
//! A stateless façade over the backend document store plus two observable
//! collections published through `tokio::sync::watch`. Fetches replace a
//! collection wholesale; `create_conversation` is the one operation that
//! mutates incrementally (append + re-sort); `send_message` touches no
//! local collection at all and callers re-fetch to observe the new message.
//!
//! A failed operation never changes a collection: callers may treat any
//! returned error as "collection unchanged".

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, json};
use tokio::sync::watch;
use tracing::{debug, info};

use banter_types::chat::{Conversation, Message};
use banter_types::error::ChatError;

use crate::backend::{Document, DocumentCollection, DocumentQuery, DocumentsApi, member_grants};

// Attribute names fixed by the backend collections' schemas.
const ATTR_MEMBERS: &str = "members";
const ATTR_LAST_MESSAGE: &str = "lastMessage";
const ATTR_LAST_MESSAGE_TIMESTAMP: &str = "lastMessageTimestamp";
const ATTR_CONVERSATION_ID: &str = "conversationId";
const ATTR_SENDER_ID: &str = "senderId";
const ATTR_TEXT: &str = "text";
// Server-managed creation timestamp, also the message sort key.
const ATTR_CREATED_AT: &str = "$createdAt";

/// Data access for conversations and messages over an injected
/// [`DocumentsApi`] client.
///
/// Owns the two observable collections exclusively; consumers read them via
/// [`ChatRepository::conversations`] / [`ChatRepository::messages`] or the
/// corresponding `subscribe_*` receivers, and never mutate them directly.
/// Each mutation lands as a single `watch` update.
///
/// Overlapping calls for the same resource are not serialized: two
/// concurrent fetches race and the collection holds whichever response is
/// applied last.
pub struct ChatRepository<D: DocumentsApi> {
    documents: Arc<D>,
    conversations: watch::Sender<Vec<Conversation>>,
    messages: watch::Sender<Vec<Message>>,
}

impl<D: DocumentsApi> ChatRepository<D> {
    /// Create a repository with empty collections.
    pub fn new(documents: Arc<D>) -> Self {
        let (conversations, _) = watch::channel(Vec::new());
        let (messages, _) = watch::channel(Vec::new());
        Self {
            documents,
            conversations,
            messages,
        }
    }

    /// Snapshot of the conversation collection.
    pub fn conversations(&self) -> Vec<Conversation> {
        self.conversations.borrow().clone()
    }

    /// Snapshot of the message collection.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    /// Subscribe to conversation collection changes.
    pub fn subscribe_conversations(&self) -> watch::Receiver<Vec<Conversation>> {
        self.conversations.subscribe()
    }

    /// Subscribe to message collection changes.
    pub fn subscribe_messages(&self) -> watch::Receiver<Vec<Message>> {
        self.messages.subscribe()
    }

    /// Fetch every conversation the given user is a member of and replace
    /// the conversation collection wholesale, in the order the server
    /// returned. A record with a missing or ill-formed `members` field
    /// fails the whole call and discards the partial result.
    pub async fn fetch_conversations(&self, user_id: &str) -> Result<(), ChatError> {
        debug!(user_id, "fetching conversations");
        let documents = self
            .documents
            .list_documents(
                DocumentCollection::Conversations,
                &[DocumentQuery::Contains {
                    attribute: ATTR_MEMBERS.to_string(),
                    value: user_id.to_string(),
                }],
            )
            .await?;

        let fetched = documents
            .into_iter()
            .map(parse_conversation)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = fetched.len(), "conversations fetched");
        self.conversations.send_replace(fetched);
        Ok(())
    }

    /// Fetch the messages of a conversation, newest first (server-side
    /// ordering on creation time), and replace the message collection
    /// wholesale. Any record missing a required field or carrying an
    /// unparsable timestamp fails the whole call.
    pub async fn fetch_messages(&self, conversation_id: &str) -> Result<(), ChatError> {
        debug!(conversation_id, "fetching messages");
        let documents = self
            .documents
            .list_documents(
                DocumentCollection::Messages,
                &[
                    DocumentQuery::Equal {
                        attribute: ATTR_CONVERSATION_ID.to_string(),
                        value: conversation_id.to_string(),
                    },
                    DocumentQuery::OrderDesc {
                        attribute: ATTR_CREATED_AT.to_string(),
                    },
                ],
            )
            .await?;

        let fetched = documents
            .into_iter()
            .map(parse_message)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = fetched.len(), "messages fetched");
        self.messages.send_replace(fetched);
        Ok(())
    }

    /// Create a conversation with the given members, granting each member
    /// read and write on the document. On success the new conversation is
    /// appended locally and the whole collection re-sorted descending by
    /// last-message timestamp (missing timestamps last).
    pub async fn create_conversation(
        &self,
        members: Vec<String>,
    ) -> Result<Conversation, ChatError> {
        if members.is_empty() {
            return Err(ChatError::NoMembers);
        }
        debug!(?members, "creating conversation");

        let mut data = Map::new();
        data.insert(ATTR_MEMBERS.to_string(), json!(members));
        data.insert(ATTR_LAST_MESSAGE.to_string(), json!(""));
        data.insert(
            ATTR_LAST_MESSAGE_TIMESTAMP.to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        let permissions = member_grants(&members);
        let document = self
            .documents
            .create_document(DocumentCollection::Conversations, data, &permissions)
            .await?;

        info!(conversation_id = %document.id, "conversation created");
        let conversation = Conversation {
            id: document.id,
            members,
            last_message: None,
            last_message_at: document.created_at.as_deref().and_then(parse_timestamp),
        };

        self.conversations.send_modify(|list| {
            list.push(conversation.clone());
            list.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        });
        Ok(conversation)
    }

    /// Send a message into a conversation.
    ///
    /// Reads the conversation document first to learn its members (the
    /// permission grants come from that list, not from the caller); if that
    /// read fails, nothing is created. On success returns the new message
    /// document's id. The local collections are not touched; callers
    /// re-fetch to observe the message.
    pub async fn send_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        text: &str,
    ) -> Result<String, ChatError> {
        debug!(conversation_id, sender_id, "sending message");

        let conversation = self
            .documents
            .get_document(DocumentCollection::Conversations, conversation_id)
            .await?;
        let members = conversation
            .string_array(ATTR_MEMBERS)
            .ok_or(ChatError::InvalidDocument(ATTR_MEMBERS))?;

        let mut data = Map::new();
        data.insert(ATTR_CONVERSATION_ID.to_string(), json!(conversation_id));
        data.insert(ATTR_SENDER_ID.to_string(), json!(sender_id));
        data.insert(ATTR_TEXT.to_string(), json!(text));

        let permissions = member_grants(&members);
        let document = self
            .documents
            .create_document(DocumentCollection::Messages, data, &permissions)
            .await?;

        info!(message_id = %document.id, conversation_id, "message sent");
        Ok(document.id)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Parse a conversation document. `members` is required; the last-message
/// preview and its timestamp are best-effort (absent or unparsable maps to
/// `None`, matching what the backend stores for a fresh conversation).
fn parse_conversation(document: Document) -> Result<Conversation, ChatError> {
    let members = document
        .string_array(ATTR_MEMBERS)
        .ok_or(ChatError::InvalidDocument(ATTR_MEMBERS))?;
    let last_message = document.string(ATTR_LAST_MESSAGE).map(str::to_string);
    let last_message_at = document
        .string(ATTR_LAST_MESSAGE_TIMESTAMP)
        .and_then(parse_timestamp);

    Ok(Conversation {
        id: document.id,
        members,
        last_message,
        last_message_at,
    })
}

/// Parse a message document. Every field is required, including a parsable
/// server-side creation timestamp.
fn parse_message(document: Document) -> Result<Message, ChatError> {
    let conversation_id = document
        .string(ATTR_CONVERSATION_ID)
        .ok_or(ChatError::InvalidDocument(ATTR_CONVERSATION_ID))?
        .to_string();
    let sender_id = document
        .string(ATTR_SENDER_ID)
        .ok_or(ChatError::InvalidDocument(ATTR_SENDER_ID))?
        .to_string();
    let text = document
        .string(ATTR_TEXT)
        .ok_or(ChatError::InvalidDocument(ATTR_TEXT))?
        .to_string();
    let sent_at = document
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .ok_or(ChatError::InvalidDocument(ATTR_CREATED_AT))?;

    Ok(Message {
        id: document.id,
        conversation_id,
        sender_id,
        text,
        sent_at,
    })
}
