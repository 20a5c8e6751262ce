use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::ApiConfig,
    error,
    management::ArtistsManager,
    spotify::Session,
    success,
    types::{Artist, ArtistTableRow},
    warning,
};

pub async fn update_artists(config: ApiConfig) {
    let mut session = match Session::connect(config).await {
        Ok(session) => session,
        Err(e) => {
            error!(
                "Failed to load token. Please run spinlog auth\n Error: {}",
                e
            );
        }
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching followed artists...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut all_artists: Vec<Artist> = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let result = session.followed_artists(50, after.clone()).await;

        match result {
            Ok((artists, next_after)) => {
                if artists.is_empty() {
                    break;
                }

                all_artists.extend(artists);
                pb.set_message(format!("Fetched {} artists...", all_artists.len()));
                after = next_after;

                if after.is_none() {
                    break;
                }
            }
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to fetch artists: {}", e);
            }
        }
    }

    pb.finish_and_clear();
    success!("Fetched {} artists!", all_artists.len());

    let artists_mgr = ArtistsManager::new(all_artists);
    if let Err(e) = artists_mgr.persist().await {
        error!("Failed to cache artists. Err: {}", e);
    }
}

pub async fn list_artists(search: Option<String>) {
    match ArtistsManager::load().await {
        Ok(artists_mgr) => {
            // sort artists by name
            let mut sorted_artists = artists_mgr.get_artists();
            sorted_artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            if let Some(artist_search) = search {
                let search_term = artist_search.to_lowercase();
                sorted_artists.retain(|a| a.name.to_lowercase().contains(&search_term));
            }

            let table_rows: Vec<ArtistTableRow> = sorted_artists
                .into_iter()
                .map(|a| ArtistTableRow {
                    name: a.name,
                    genres: a
                        .genres
                        .iter()
                        .take(3)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(","),
                })
                .collect();

            let table = Table::new(table_rows);
            println!("{}", table);
        }
        Err(e) => warning!("Failed to load artists. Err: {}", e),
    }
}
