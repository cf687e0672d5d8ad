//! Infrastructure layer for Banter: the HTTP client for the hosted
//! document backend and configuration-file loading.
//!
//! Implements the backend traits from banter-core; nothing above this
//! crate talks to the network directly.

pub mod appwrite;
pub mod config;

pub use appwrite::AppwriteClient;
