//! CLI command definitions and dispatch for the `banter` binary.
//!
//! Uses clap derive macros for argument parsing. Commands map one-to-one
//! onto the session store and chat repository operations.

pub mod auth;
pub mod chat;

use clap::{Parser, Subcommand};

/// Chat with people through a hosted backend.
#[derive(Parser)]
#[command(name = "banter", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in.
    Register {
        /// Display name for the new account.
        name: String,
        /// Email to register with.
        email: String,
    },

    /// Log in with email and password.
    Login {
        /// Email of an existing account.
        email: String,
    },

    /// Delete the current session.
    Logout,

    /// Show the identity behind the current session.
    Whoami,

    /// List your conversations.
    #[command(alias = "ls")]
    Conversations,

    /// Start a conversation with one or more people (you are included
    /// automatically).
    New {
        /// Member emails.
        #[arg(required = true)]
        members: Vec<String>,
    },

    /// List the messages of a conversation, newest first.
    Messages {
        /// Conversation id.
        conversation_id: String,
    },

    /// Send a message into a conversation.
    Send {
        /// Conversation id.
        conversation_id: String,
        /// Message text.
        text: String,
    },
}
