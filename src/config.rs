//! Configuration management for the listening history collector.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials,
//! callback server settings, and the endpoints the client talks to.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//!
//! All values that the API session needs are gathered once into an
//! [`ApiConfig`] at startup and handed to the session explicitly; nothing in
//! the fetch path reads the environment on its own.

use dotenv;
use std::{env, path::PathBuf};

/// Configuration handed to the Spotify session and the auth flow.
///
/// Built once from the environment via [`ApiConfig::from_env`] after
/// [`load_env`] has run. Keeping the values in a struct (instead of reading
/// environment variables at the call sites) makes the session constructible
/// in tests without any ambient state.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
}

impl ApiConfig {
    /// Reads all required variables from the environment.
    ///
    /// Returns an error naming the first missing variable instead of
    /// panicking, so the caller can surface a startup failure to the
    /// operator.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            client_id: require("SPOTIFY_API_AUTH_CLIENT_ID")?,
            redirect_uri: require("SPOTIFY_API_REDIRECT_URI")?,
            scope: require("SPOTIFY_API_AUTH_SCOPE")?,
            auth_url: require("SPOTIFY_API_AUTH_URL")?,
            token_url: require("SPOTIFY_API_TOKEN_URL")?,
            api_url: require("SPOTIFY_API_URL")?,
            server_addr: require("SERVER_ADDRESS")?,
        })
    }
}

fn require(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{} must be set", name))
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `spinlog/.env`. This allows users to store
/// configuration securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spinlog/.env`
/// - macOS: `~/Library/Application Support/spinlog/.env`
/// - Windows: `%LOCALAPPDATA%/spinlog/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file cannot be read or parsed
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spinlog/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(())
}

/// Base directory for all persisted application data.
///
/// Cursor state, snapshots, the token cache and the followed-artists dump
/// all live below this directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spinlog");
    path
}
