use crate::{
    error, info,
    management::{CursorManager, SnapshotManager},
};

/// Displays operator status information.
///
/// `--cursor` shows the stored pagination cursor, `--snapshots` shows the
/// snapshot inventory; with neither flag both are printed.
pub async fn info(cursor: bool, snapshots: bool) {
    let show_all = !cursor && !snapshots;

    if cursor || show_all {
        match CursorManager::new().load().await {
            Ok(Some(c)) => info!("Stored cursor: {}", c),
            Ok(None) => info!("No cursor stored yet; the next run fetches from the beginning."),
            Err(e) => error!("Failed to read cursor state: {}", e),
        }
    }

    if snapshots || show_all {
        let snapshot_mgr = SnapshotManager::new();
        let paths = match snapshot_mgr.list().await {
            Ok(paths) => paths,
            Err(e) => error!("Failed to list snapshots: {}", e),
        };

        info!("Snapshot count: {}", paths.len());
        if let Some(latest) = paths.last() {
            info!(
                "Newest snapshot: {}",
                latest
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
            );
        }
    }
}
