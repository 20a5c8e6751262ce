//! # Spotify Integration Module
//!
//! The integration layer between spinlog and the Spotify Web API. It handles
//! OAuth 2.0 PKCE authentication, token refresh, rate limiting and the two
//! data endpoints the collector consumes:
//!
//! - `GET /me/player/recently-played` - incremental listening history
//! - `GET /me/following` - followed artists
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Recently Played (cursor-based incremental fetch)
//!     └── Followed Artists (cursor-based pagination)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! All API access goes through a [`Session`], which is constructed from an
//! explicit [`ApiConfig`] and the cached token. Nothing below this module
//! reads the environment; configuration flows in from the top.
//!
//! ## Error Handling
//!
//! - 429 Too Many Requests: honored via the `retry-after` header up to two
//!   minutes, warned about beyond that
//! - 502 Bad Gateway: retried after a 10 second delay
//! - expired tokens: refreshed transparently before each request
//! - a missing token cache is a startup failure directing the user to
//!   `spinlog auth`

pub mod artists;
pub mod auth;
pub mod recent;

use crate::{config::ApiConfig, management::TokenManager};

pub use recent::FetchOutcome;

/// An authenticated handle to the Spotify Web API.
///
/// Owns the endpoint configuration and the token manager; request methods
/// live in the [`recent`] and [`artists`] submodules.
pub struct Session {
    config: ApiConfig,
    token_mgr: TokenManager,
}

impl Session {
    /// Builds a session from the cached token.
    ///
    /// Fails if no token has been cached yet; the caller should direct the
    /// user to `spinlog auth`. This is the only fatal startup path of the
    /// ingestion pipeline and happens before any write.
    pub async fn connect(config: ApiConfig) -> Result<Self, String> {
        let token_mgr = TokenManager::load().await?;
        Ok(Self { config, token_mgr })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}
