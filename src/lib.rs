//! HTTP relay between a tourism chat client and Vertex AI Gemini.
//!
//! `POST /chat` takes the client's conversation plus a city, prepends a
//! priming instruction, forwards it to the model and returns `{ "answer" }`.
//! Provider failures are answered with an apology instead of an error status.

pub mod api;
pub mod chat;
pub mod config;
