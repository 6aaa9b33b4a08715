//! Chat backend transport.
//!
//! The backend accepts `{ "message": ... }` and answers with
//! `{ "reply": ... }` or `{ "error": ... }`. What it does with the message
//! is its own business; this side only guarantees what gets sent.

pub mod client;
pub mod types;

pub use client::{BackendClient, BackendError, UNKNOWN_SERVER_ERROR};
pub use types::{ChatRequest, ChatResponse};
