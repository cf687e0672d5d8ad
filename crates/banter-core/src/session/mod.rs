//! Authentication session state for Banter.
//!
//! This module defines the `SessionStore`, the state machine that owns the
//! authenticated identity, and the `AuthState` value it publishes.

pub mod store;

pub use store::{AuthState, SessionStore};
