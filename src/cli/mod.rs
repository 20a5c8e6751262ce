//! # CLI Module
//!
//! The command-line interface layer for spinlog. Each submodule implements
//! one user-facing command and coordinates the management and Spotify
//! layers underneath it.
//!
//! ## Commands
//!
//! - [`auth`] - OAuth 2.0 PKCE authentication flow
//! - [`update_recent`] - one ingestion run: read cursor, fetch new play
//!   events, write a snapshot, advance the cursor
//! - [`list_recent`] - show the newest snapshot's play events in a table
//! - [`export`] - flatten all snapshots into the consolidated CSV dataset
//! - [`update_artists`] / [`list_artists`] - refresh and display the
//!   followed-artists dump
//! - [`info`] - operator status: stored cursor, snapshot inventory
//!
//! ## Data Flow
//!
//! An ingestion run touches the shared state in a fixed order: the cursor
//! is read before any write decision, the snapshot is written before the
//! cursor is advanced. A crash in between re-fetches the same batch on the
//! next run (at-least-once) but never loses data. Export runs are
//! independent of ingestion and never write anything except the output
//! CSV.
//!
//! ## Error Handling Philosophy
//!
//! Only authentication and connectivity failures abort a run, via the
//! [`crate::error!`] macro. Everything else degrades gracefully: an empty
//! batch is informational, a missing cursor means fetch-from-the-beginning,
//! a snapshot that fails to parse during export is reported and skipped.

mod artists;
mod auth;
mod export;
mod info;
mod recent;

pub use artists::list_artists;
pub use artists::update_artists;
pub use auth::auth;
pub use export::collect_rows;
pub use export::export;
pub use export::write_csv;
pub use info::info;
pub use recent::list_recent;
pub use recent::persist_outcome;
pub use recent::update_recent;
