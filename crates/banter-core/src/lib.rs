//! Core logic for Banter: the session state machine and the chat
//! repository, written against backend traits so the hosted service can be
//! swapped for mocks in tests.
//!
//! Nothing in this crate performs I/O directly; all network effects go
//! through the [`backend::AccountApi`] and [`backend::DocumentsApi`] traits,
//! implemented in banter-infra.

pub mod backend;
pub mod chat;
pub mod session;
