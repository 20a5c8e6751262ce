use std::path::PathBuf;

use crate::{
    config, error, info,
    management::SnapshotManager,
    success,
    types::TrackRow,
    utils, warning,
};

/// Flattens all snapshots into the consolidated CSV dataset.
///
/// Rows come out in (snapshot file order, event order within file, artist
/// order within event); no sort and no deduplication are applied. The
/// output file is named after the given date (today by default).
pub async fn export(date: Option<String>) {
    let snapshot_mgr = SnapshotManager::new();
    let paths = match snapshot_mgr.list().await {
        Ok(paths) => paths,
        Err(e) => error!("Failed to list snapshots: {}", e),
    };

    if paths.is_empty() {
        info!("No snapshots found. Run spinlog recent update first.");
        return;
    }

    let (rows, failed) = collect_rows(&snapshot_mgr, &paths).await;

    let out_dir = config::data_dir().join("processed");
    if let Err(e) = async_fs::create_dir_all(&out_dir).await {
        error!("Failed to create output directory: {}", e);
    }

    let out_path = out_dir.join(utils::export_file_name(utils::get_date_from_string(date)));
    if let Err(e) = write_csv(&out_path, &rows) {
        error!("Failed to write {}: {}", out_path.display(), e);
    }

    success!(
        "Wrote {} rows from {} snapshots to {}.",
        rows.len(),
        paths.len() - failed.len(),
        out_path.display()
    );
    if !failed.is_empty() {
        warning!("{} snapshot file(s) failed to parse and were skipped.", failed.len());
    }
}

/// Parses and flattens the given snapshot files.
///
/// A file that fails to parse is reported to the operator and returned in
/// the failure list; the remaining files still contribute their rows.
pub async fn collect_rows(
    snapshot_mgr: &SnapshotManager,
    paths: &[PathBuf],
) -> (Vec<TrackRow>, Vec<PathBuf>) {
    let mut rows: Vec<TrackRow> = Vec::new();
    let mut failed: Vec<PathBuf> = Vec::new();

    for path in paths {
        match snapshot_mgr.load(path).await {
            Ok(batch) => rows.extend(utils::flatten_batch(&batch)),
            Err(e) => {
                warning!("The following file had issues: {} ({})", path.display(), e);
                failed.push(path.clone());
            }
        }
    }

    (rows, failed)
}

/// Writes the flattened rows as CSV with the fixed 11-column header.
///
/// `serialize` only emits the header before the first row, so an empty
/// dataset gets its header written explicitly; the output file always
/// carries the column names.
pub fn write_csv(path: &std::path::Path, rows: &[TrackRow]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        writer.write_record(TrackRow::COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
