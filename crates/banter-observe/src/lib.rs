//! Observability helpers for Banter.

pub mod tracing_setup;
