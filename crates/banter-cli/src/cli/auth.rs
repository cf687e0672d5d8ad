//! Account CLI commands: register, login, logout, whoami.

use anyhow::Result;
use console::style;
use dialoguer::Password;
use secrecy::SecretString;

use crate::session_file;
use crate::state::AppState;

/// Create an account, open a session for it, and persist the token.
pub async fn register(state: &AppState, name: &str, email: &str, json: bool) -> Result<()> {
    let password = prompt_password(true)?;
    let identity = state.session.register(name, email, &password).await?;
    persist_session(state).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
        return Ok(());
    }
    println!(
        "  {} Registered and logged in as {} <{}>",
        style("✓").green().bold(),
        style(&identity.name).cyan(),
        identity.email
    );
    Ok(())
}

/// Open a session for an existing account and persist the token.
pub async fn login(state: &AppState, email: &str, json: bool) -> Result<()> {
    let password = prompt_password(false)?;
    let identity = state.session.login(email, &password).await?;
    persist_session(state).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
        return Ok(());
    }
    println!(
        "  {} Logged in as {} <{}>",
        style("✓").green().bold(),
        style(&identity.name).cyan(),
        identity.email
    );
    Ok(())
}

/// Delete the current session and drop the persisted token.
pub async fn logout(state: &AppState, json: bool) -> Result<()> {
    state.session.logout().await?;
    session_file::clear(&state.data_dir).await?;

    if json {
        println!("{}", serde_json::json!({ "logged_out": true }));
        return Ok(());
    }
    println!("  {} Logged out", style("✓").green().bold());
    Ok(())
}

/// Show the identity behind the current session.
pub async fn whoami(state: &AppState, json: bool) -> Result<()> {
    let identity = state.require_identity().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
        return Ok(());
    }
    println!(
        "  {} <{}> (id {})",
        style(&identity.name).cyan(),
        identity.email,
        identity.id
    );
    Ok(())
}

fn prompt_password(confirm: bool) -> Result<SecretString> {
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(SecretString::from(prompt.interact()?))
}

async fn persist_session(state: &AppState) -> Result<()> {
    if let Some(secret) = state.client.session_secret() {
        session_file::store(&state.data_dir, &secret).await?;
    }
    Ok(())
}
