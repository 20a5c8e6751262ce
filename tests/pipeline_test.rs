use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use spinlog::cli::{collect_rows, persist_outcome, write_csv};
use spinlog::management::{CursorManager, SnapshotManager};
use spinlog::spotify::FetchOutcome;
use spinlog::types::{
    Cursors, PlayedItem, RecentlyPlayedResponse, Track, TrackAlbum, TrackArtist, TrackRow,
};
use spinlog::utils;

fn create_test_item(played_at: &str, track_id: &str, artists: &[(&str, &str)]) -> PlayedItem {
    PlayedItem {
        played_at: played_at.to_string(),
        track: Track {
            id: track_id.to_string(),
            name: format!("{}_name", track_id),
            duration_ms: 180_000,
            popularity: 55,
            artists: artists
                .iter()
                .map(|(id, name)| TrackArtist {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            album: TrackAlbum {
                id: format!("{}_album", track_id),
                name: format!("{}_album_name", track_id),
                release_date: "2023-10-01".to_string(),
                release_date_precision: "day".to_string(),
            },
        },
    }
}

fn create_test_batch(items: Vec<PlayedItem>, after: Option<&str>) -> RecentlyPlayedResponse {
    RecentlyPlayedResponse {
        items,
        cursors: Some(Cursors {
            after: after.map(|a| a.to_string()),
        }),
        next: None,
    }
}

#[tokio::test]
async fn test_cursor_save_load_round_trip() {
    let tmp = tempdir().unwrap();
    let cursor_mgr = CursorManager::at(tmp.path().join("state/after.json"));

    cursor_mgr.persist("1697551200000").await.unwrap();
    assert_eq!(
        cursor_mgr.load().await.unwrap(),
        Some("1697551200000".to_string())
    );

    // Cursors are opaque - unusual characters must survive unchanged
    let odd = "a/b+c=\"quoted\"";
    cursor_mgr.persist(odd).await.unwrap();
    assert_eq!(cursor_mgr.load().await.unwrap(), Some(odd.to_string()));
}

#[tokio::test]
async fn test_cursor_load_missing_is_absent() {
    let tmp = tempdir().unwrap();
    let cursor_mgr = CursorManager::at(tmp.path().join("state/after.json"));

    // A store with no prior save reports absence, not an error
    assert_eq!(cursor_mgr.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_cursor_persist_leaves_no_temp_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("after.json");
    let cursor_mgr = CursorManager::at(path.clone());

    cursor_mgr.persist("first").await.unwrap();
    cursor_mgr.persist("second").await.unwrap();
    assert_eq!(cursor_mgr.load().await.unwrap(), Some("second".to_string()));

    // Only the final file should remain after the atomic replace
    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["after.json".to_string()]);
}

#[tokio::test]
async fn test_empty_batch_persists_nothing() {
    let tmp = tempdir().unwrap();
    let snapshot_mgr = SnapshotManager::at(tmp.path().join("snapshots"));
    let cursor_mgr = CursorManager::at(tmp.path().join("after.json"));
    cursor_mgr.persist("old-cursor").await.unwrap();

    // Zero events and no advance marker - the nothing-new-this-run case
    let outcome = FetchOutcome::NoCursor {
        batch: create_test_batch(Vec::new(), None),
    };
    let timestamp = Utc.with_ymd_and_hms(2023, 10, 17, 12, 0, 0).unwrap();

    let written = persist_outcome(&outcome, &snapshot_mgr, &cursor_mgr, timestamp)
        .await
        .unwrap();

    // No snapshot file is created and the stored cursor is unchanged
    assert_eq!(written, None);
    assert!(snapshot_mgr.list().await.unwrap().is_empty());
    assert_eq!(
        cursor_mgr.load().await.unwrap(),
        Some("old-cursor".to_string())
    );
}

#[tokio::test]
async fn test_non_empty_batch_writes_snapshot_and_cursor() {
    let tmp = tempdir().unwrap();
    let snapshot_mgr = SnapshotManager::at(tmp.path().join("snapshots"));
    let cursor_mgr = CursorManager::at(tmp.path().join("after.json"));

    // Three events: one with two artists, two with one artist each
    let batch = create_test_batch(
        vec![
            create_test_item(
                "2023-10-17T12:00:00.000Z",
                "t1",
                &[("a1", "One"), ("a2", "Two")],
            ),
            create_test_item("2023-10-17T12:04:00.000Z", "t2", &[("a3", "Three")]),
            create_test_item("2023-10-17T12:08:00.000Z", "t3", &[("a4", "Four")]),
        ],
        Some("abc123"),
    );
    let outcome = FetchOutcome::Advanced {
        batch,
        after: "abc123".to_string(),
    };
    let timestamp = Utc.with_ymd_and_hms(2023, 10, 17, 12, 10, 0).unwrap();

    let written = persist_outcome(&outcome, &snapshot_mgr, &cursor_mgr, timestamp)
        .await
        .unwrap();
    assert!(written.is_some());

    // Exactly one snapshot file, holding the three raw events
    let paths = snapshot_mgr.list().await.unwrap();
    assert_eq!(paths.len(), 1);
    let stored = snapshot_mgr.load(&paths[0]).await.unwrap();
    assert_eq!(stored.items.len(), 3);

    // Cursor store now holds the new cursor
    assert_eq!(cursor_mgr.load().await.unwrap(), Some("abc123".to_string()));

    // Normalizing the single snapshot yields one row per (event, artist)
    let (rows, failed) = collect_rows(&snapshot_mgr, &paths).await;
    assert!(failed.is_empty());
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn test_no_cursor_outcome_keeps_previous_cursor() {
    let tmp = tempdir().unwrap();
    let snapshot_mgr = SnapshotManager::at(tmp.path().join("snapshots"));
    let cursor_mgr = CursorManager::at(tmp.path().join("after.json"));
    cursor_mgr.persist("previous").await.unwrap();

    let outcome = FetchOutcome::NoCursor {
        batch: create_test_batch(
            vec![create_test_item(
                "2023-10-17T12:00:00.000Z",
                "t1",
                &[("a1", "One")],
            )],
            None,
        ),
    };
    let timestamp = Utc.with_ymd_and_hms(2023, 10, 17, 12, 30, 0).unwrap();

    let written = persist_outcome(&outcome, &snapshot_mgr, &cursor_mgr, timestamp)
        .await
        .unwrap();

    // The batch is still persisted, the cursor falls back to the old value
    assert!(written.is_some());
    assert_eq!(snapshot_mgr.list().await.unwrap().len(), 1);
    assert_eq!(
        cursor_mgr.load().await.unwrap(),
        Some("previous".to_string())
    );
}

#[tokio::test]
async fn test_snapshot_round_trip_is_lossless() {
    let tmp = tempdir().unwrap();
    let snapshot_mgr = SnapshotManager::at(tmp.path().join("snapshots"));

    let batch = create_test_batch(
        vec![create_test_item(
            "2023-10-17T12:00:00.000Z",
            "t1",
            &[("a1", "One"), ("a2", "Two")],
        )],
        Some("cursor-value"),
    );
    let timestamp = Utc.with_ymd_and_hms(2023, 10, 17, 12, 0, 0).unwrap();

    let path = snapshot_mgr.write(&batch, timestamp).await.unwrap();
    let loaded = snapshot_mgr.load(&path).await.unwrap();

    assert_eq!(
        serde_json::to_value(&batch).unwrap(),
        serde_json::to_value(&loaded).unwrap()
    );
}

#[tokio::test]
async fn test_snapshot_list_is_sorted_and_ignores_foreign_files() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("snapshots");
    let snapshot_mgr = SnapshotManager::at(dir.clone());

    let batch = create_test_batch(Vec::new(), None);
    snapshot_mgr
        .write(&batch, Utc.with_ymd_and_hms(2023, 10, 18, 9, 0, 0).unwrap())
        .await
        .unwrap();
    snapshot_mgr
        .write(&batch, Utc.with_ymd_and_hms(2023, 10, 17, 9, 0, 0).unwrap())
        .await
        .unwrap();
    std::fs::write(dir.join("notes.txt"), "not a snapshot").unwrap();

    let paths = snapshot_mgr.list().await.unwrap();
    assert_eq!(paths.len(), 2);

    let names: Vec<&str> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "2023-10-17-090000-recently-played.json",
            "2023-10-18-090000-recently-played.json"
        ]
    );
}

#[test]
fn test_write_csv_header_and_column_order() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("out.csv");

    let item = create_test_item(
        "2023-10-17T12:00:00.000Z",
        "t1",
        &[("a1", "One"), ("a2", "Two")],
    );
    let rows = utils::flatten_item(&item);
    write_csv(&path, &rows).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    // Header row carries the fixed column set in field order
    assert_eq!(lines[0], TrackRow::COLUMNS.join(","));
    assert_eq!(
        lines[0],
        "played_at,track_id,track_name,artist_id,artist_name,album_id,album_name,\
         release_date,release_date_precision,duration_ms,track_popularity"
    );

    // One data line per (event, artist) row, in artist order
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2023-10-17T12:00:00.000Z,t1,t1_name,a1,One,"));
    assert!(lines[2].starts_with("2023-10-17T12:00:00.000Z,t1,t1_name,a2,Two,"));
}

#[test]
fn test_write_csv_empty_dataset_still_has_header() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("empty.csv");

    write_csv(&path, &[]).unwrap();

    // No rows to serialize, but the column header is still written
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec![TrackRow::COLUMNS.join(",")]);
}

#[tokio::test]
async fn test_corrupt_snapshot_is_reported_and_skipped() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("snapshots");
    let snapshot_mgr = SnapshotManager::at(dir.clone());

    snapshot_mgr
        .write(
            &create_test_batch(
                vec![create_test_item(
                    "2023-10-17T12:00:00.000Z",
                    "t1",
                    &[("a1", "One")],
                )],
                None,
            ),
            Utc.with_ymd_and_hms(2023, 10, 17, 12, 0, 0).unwrap(),
        )
        .await
        .unwrap();
    snapshot_mgr
        .write(
            &create_test_batch(
                vec![create_test_item(
                    "2023-10-18T12:00:00.000Z",
                    "t2",
                    &[("a2", "Two"), ("a3", "Three")],
                )],
                None,
            ),
            Utc.with_ymd_and_hms(2023, 10, 18, 12, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    // A corrupt file that matches the snapshot naming scheme
    std::fs::write(
        dir.join("2023-10-19-120000-recently-played.json"),
        "{ not valid json",
    )
    .unwrap();

    let paths = snapshot_mgr.list().await.unwrap();
    assert_eq!(paths.len(), 3);

    let (rows, failed) = collect_rows(&snapshot_mgr, &paths).await;

    // The two valid files contribute their rows, the corrupt one is the
    // single reported failure and nothing panics
    assert_eq!(rows.len(), 3);
    assert_eq!(failed.len(), 1);
    assert!(
        failed[0]
            .to_string_lossy()
            .contains("2023-10-19-120000-recently-played.json")
    );
}
