//! Banter CLI entry point.
//!
//! Binary name: `banter`
//!
//! Parses CLI arguments, initializes the backend client and stores, then
//! dispatches to the command handlers.

mod cli;
mod session_file;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,banter=debug",
        _ => "trace",
    };
    banter_observe::tracing_setup::init_tracing(filter);

    let state = AppState::init().await?;

    match cli.command {
        Commands::Register { name, email } => {
            cli::auth::register(&state, &name, &email, cli.json).await?;
        }
        Commands::Login { email } => {
            cli::auth::login(&state, &email, cli.json).await?;
        }
        Commands::Logout => {
            cli::auth::logout(&state, cli.json).await?;
        }
        Commands::Whoami => {
            cli::auth::whoami(&state, cli.json).await?;
        }
        Commands::Conversations => {
            cli::chat::list_conversations(&state, cli.json).await?;
        }
        Commands::New { members } => {
            cli::chat::new_conversation(&state, members, cli.json).await?;
        }
        Commands::Messages { conversation_id } => {
            cli::chat::list_messages(&state, &conversation_id, cli.json).await?;
        }
        Commands::Send {
            conversation_id,
            text,
        } => {
            cli::chat::send_message(&state, &conversation_id, &text, cli.json).await?;
        }
    }

    Ok(())
}
