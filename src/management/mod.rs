mod artists;
mod auth;
mod cursor;
mod snapshot;

pub use artists::ArtistsManager;
pub use auth::TokenManager;
pub use cursor::CursorError;
pub use cursor::CursorManager;
pub use snapshot::SnapshotError;
pub use snapshot::SnapshotManager;
