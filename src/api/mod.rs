//! # API Module
//!
//! HTTP endpoints for the local callback server that completes the OAuth
//! 2.0 PKCE flow.
//!
//! - [`callback`] - Handles OAuth callback requests from Spotify's
//!   authorization server and exchanges the authorization code for tokens.
//! - [`health`] - Health check endpoint returning status and version.
//!
//! Built on [Axum](https://docs.rs/axum); the callback handler receives the
//! shared PKCE state and the [`crate::config::ApiConfig`] via extension
//! layers, so no handler reads ambient configuration.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
