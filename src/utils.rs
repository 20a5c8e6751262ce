use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, NaiveDate, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{
    types::{PlayedItem, RecentlyPlayedResponse, TrackRow},
    warning,
};

pub const SNAPSHOT_SUFFIX: &str = "-recently-played.json";

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

// Snapshot names carry second resolution; two runs within the same wall-clock
// second collide and the last write wins.
pub fn snapshot_file_name(timestamp: DateTime<Utc>) -> String {
    format!(
        "{}{}",
        timestamp.format("%Y-%m-%d-%H%M%S"),
        SNAPSHOT_SUFFIX
    )
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}_recently_played_tracks.csv", date.format("%Y-%m-%d"))
}

pub fn get_date_from_string(date: Option<String>) -> NaiveDate {
    match date {
        Some(date_str) => match NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                warning!("Cannot parse date '{}'; using today instead.", date_str);
                Utc::now().date_naive()
            }
        },
        None => Utc::now().date_naive(),
    }
}

pub fn flatten_item(item: &PlayedItem) -> Vec<TrackRow> {
    item.track
        .artists
        .iter()
        .map(|artist| TrackRow {
            played_at: item.played_at.clone(),
            track_id: item.track.id.clone(),
            track_name: item.track.name.clone(),
            artist_id: artist.id.clone(),
            artist_name: artist.name.clone(),
            album_id: item.track.album.id.clone(),
            album_name: item.track.album.name.clone(),
            release_date: item.track.album.release_date.clone(),
            release_date_precision: item.track.album.release_date_precision.clone(),
            duration_ms: item.track.duration_ms,
            track_popularity: item.track.popularity,
        })
        .collect()
}

// One row per (play event, artist) pair, preserving event order within the
// batch and artist order within each event. No deduplication happens here;
// overlapping snapshots produce duplicate rows by design.
pub fn flatten_batch(batch: &RecentlyPlayedResponse) -> Vec<TrackRow> {
    batch.items.iter().flat_map(|i| flatten_item(i)).collect()
}

pub fn join_artist_names(item: &PlayedItem) -> String {
    item.track
        .artists
        .iter()
        .map(|a| a.name.clone())
        .collect::<Vec<String>>()
        .join(", ")
}
