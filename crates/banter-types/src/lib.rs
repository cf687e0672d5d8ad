//! Shared domain types for Banter.
//!
//! This crate has no I/O and no async code. It defines the entities the
//! rest of the workspace passes around (identity, conversations, messages),
//! the backend configuration shape, and the error taxonomies.

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
