//! Appwrite-style REST backend client.
//!
//! One client instance implements both [`banter_core::backend::AccountApi`]
//! and [`banter_core::backend::DocumentsApi`]; the session store and chat
//! repository share it through an `Arc`.

pub mod client;
pub mod types;

pub use client::AppwriteClient;
