use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tabled::Table;

use crate::{
    config::ApiConfig,
    error, info,
    management::{CursorManager, SnapshotManager},
    spotify::{FetchOutcome, Session},
    success,
    types::PlayTableRow,
    utils, warning,
};

/// One ingestion run of the recently-played pipeline.
///
/// Reads the stored cursor, performs a single fetch against the API and,
/// for a non-empty batch, writes one snapshot and then advances the
/// cursor. An empty batch leaves both the snapshot directory and the
/// cursor untouched.
pub async fn update_recent(config: ApiConfig) {
    let started = Utc::now();
    info!(
        "Starting recently-played run at {}.",
        started.format("%Y-%m-%d %H:%M:%S")
    );

    let cursor_mgr = CursorManager::new();
    let cursor = match cursor_mgr.load().await {
        Ok(cursor) => cursor,
        Err(e) => error!("Failed to read cursor state: {}", e),
    };
    match &cursor {
        Some(c) => info!("Resuming after cursor {}.", c),
        None => info!("No stored cursor; fetching from the beginning."),
    }

    let mut session = match Session::connect(config).await {
        Ok(session) => session,
        Err(e) => {
            error!(
                "Failed to load token. Please run spinlog auth\n Error: {}",
                e
            );
        }
    };

    let outcome = match session.recently_played(50, cursor).await {
        Ok(outcome) => outcome,
        Err(e) => error!("Failed to fetch recently played tracks: {}", e),
    };

    let fetched = outcome.batch().items.len();
    let snapshot_mgr = SnapshotManager::new();

    match persist_outcome(&outcome, &snapshot_mgr, &cursor_mgr, started).await {
        Ok(Some(path)) => {
            success!("Persisted {} play events to {}.", fetched, path.display());
            match outcome.after() {
                Some(after) => info!("Next cursor: {}.", after),
                None => warning!("No new cursor obtained; keeping the previous one."),
            }
        }
        Ok(None) => info!("Fetched 0 play events; nothing to persist this run."),
        Err(e) => error!("{}", e),
    }
}

/// Applies one fetch outcome to the persistent state.
///
/// An empty batch persists nothing and returns `Ok(None)`. A non-empty
/// batch writes exactly one snapshot and then, if the outcome carries a new
/// cursor, advances the cursor store; an outcome without a cursor leaves
/// the store at its previous value. Snapshot before cursor: a crash in
/// between re-fetches the same batch next run instead of losing it.
pub async fn persist_outcome(
    outcome: &FetchOutcome,
    snapshot_mgr: &SnapshotManager,
    cursor_mgr: &CursorManager,
    timestamp: DateTime<Utc>,
) -> Result<Option<PathBuf>, String> {
    if outcome.batch().items.is_empty() {
        return Ok(None);
    }

    let path = snapshot_mgr
        .write(outcome.batch(), timestamp)
        .await
        .map_err(|e| format!("Failed to write snapshot: {}", e))?;

    if let Some(after) = outcome.after() {
        cursor_mgr
            .persist(after)
            .await
            .map_err(|e| format!("Failed to persist cursor: {}", e))?;
    }

    Ok(Some(path))
}

/// Shows the play events of the newest snapshot in a table.
pub async fn list_recent(limit: Option<usize>) {
    let snapshot_mgr = SnapshotManager::new();
    let paths = match snapshot_mgr.list().await {
        Ok(paths) => paths,
        Err(e) => error!("Failed to list snapshots: {}", e),
    };

    let Some(latest) = paths.last() else {
        info!("No snapshots yet. Run spinlog recent update first.");
        return;
    };

    let batch = match snapshot_mgr.load(latest).await {
        Ok(batch) => batch,
        Err(e) => error!("Failed to read snapshot {}: {}", latest.display(), e),
    };

    let table_rows: Vec<PlayTableRow> = batch
        .items
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|item| PlayTableRow {
            played_at: item.played_at.clone(),
            track: item.track.name.clone(),
            artists: utils::join_artist_names(item),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
