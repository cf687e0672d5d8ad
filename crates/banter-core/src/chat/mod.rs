//! Conversation and message data access for Banter.
//!
//! This module defines the `ChatRepository`, the façade over the backend
//! document store that owns the two observable collections the presentation
//! layer renders.

pub mod repository;

pub use repository::ChatRepository;
