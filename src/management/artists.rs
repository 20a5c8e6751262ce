use std::path::PathBuf;

use crate::{config, types::Artist};

/// Local dump of the user's followed artists.
///
/// Refreshed wholesale by `spinlog artists update`; downstream consumers
/// read the JSON file directly.
pub struct ArtistsManager {
    artists: Vec<Artist>,
}

impl ArtistsManager {
    pub fn new(artists: Vec<Artist>) -> Self {
        Self { artists }
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::cache_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let artists: Vec<Artist> = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { artists })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::cache_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.artists).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    pub fn get_artists(&self) -> Vec<Artist> {
        self.artists.clone()
    }

    pub fn count(&self) -> usize {
        self.artists.len()
    }

    fn cache_path() -> PathBuf {
        config::data_dir().join("cache/followed-artists.json")
    }
}
