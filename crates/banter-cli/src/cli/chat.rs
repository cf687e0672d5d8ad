//! Conversation and message CLI commands.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use banter_types::chat::Conversation;

use crate::state::AppState;

/// List the conversations the logged-in user is a member of.
pub async fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let identity = state.require_identity().await?;
    state.chat.fetch_conversations(&identity.id).await?;
    let conversations = state.chat.conversations();

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start one with: {}",
            style("i").blue().bold(),
            style("banter new <email>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Members").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
        Cell::new("When").fg(Color::White),
    ]);

    for conversation in &conversations {
        table.add_row(vec![
            Cell::new(&conversation.id),
            Cell::new(other_members(conversation, &identity.email)),
            Cell::new(conversation.last_message.as_deref().unwrap_or("")),
            Cell::new(
                conversation
                    .last_message_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Start a conversation; the logged-in user's email is always a member.
pub async fn new_conversation(state: &AppState, members: Vec<String>, json: bool) -> Result<()> {
    let identity = state.require_identity().await?;

    let mut all_members: Vec<String> = members
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if !all_members.contains(&identity.email) {
        all_members.push(identity.email.clone());
    }
    all_members.dedup();

    let conversation = state.chat.create_conversation(all_members).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
        return Ok(());
    }
    println!(
        "  {} Conversation {} created with {}",
        style("✓").green().bold(),
        style(&conversation.id).cyan(),
        conversation.members.join(", ")
    );
    Ok(())
}

/// List a conversation's messages, newest first.
pub async fn list_messages(state: &AppState, conversation_id: &str, json: bool) -> Result<()> {
    let identity = state.require_identity().await?;
    state.chat.fetch_messages(conversation_id).await?;
    let messages = state.chat.messages();

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  {} No messages yet", style("i").blue().bold());
        println!();
        return Ok(());
    }

    for message in &messages {
        let sender = if message.sender_id == identity.id {
            style("you").green().to_string()
        } else {
            style(&message.sender_id).cyan().to_string()
        };
        println!(
            "  {}  {}  {}",
            style(message.sent_at.format("%Y-%m-%d %H:%M")).dim(),
            sender,
            message.text
        );
    }
    Ok(())
}

/// Send a message. The new message shows up on the next `messages` fetch.
pub async fn send_message(
    state: &AppState,
    conversation_id: &str,
    text: &str,
    json: bool,
) -> Result<()> {
    if text.trim().is_empty() {
        bail!("message text is empty");
    }

    let identity = state.require_identity().await?;
    let message_id = state
        .chat
        .send_message(conversation_id, &identity.id, text)
        .await?;

    if json {
        println!("{}", serde_json::json!({ "message_id": message_id }));
        return Ok(());
    }
    println!(
        "  {} Sent. See it with: {}",
        style("✓").green().bold(),
        style(format!("banter messages {conversation_id}")).yellow()
    );
    Ok(())
}

fn other_members(conversation: &Conversation, own_email: &str) -> String {
    let others: Vec<&str> = conversation
        .members
        .iter()
        .filter(|m| m.as_str() != own_email)
        .map(String::as_str)
        .collect();
    if others.is_empty() {
        "just you".to_string()
    } else {
        others.join(", ")
    }
}
