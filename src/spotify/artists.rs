use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    spotify::Session,
    types::{Artist, FollowedArtistsResponse},
};

impl Session {
    /// Retrieves a page of followed artists from the Spotify Web API.
    ///
    /// Uses the same cursor-based pagination scheme as the recently-played
    /// endpoint, except that here an absent cursor simply means the last
    /// page was reached. Retries automatically on 502 Bad Gateway.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of artists per page (1-50)
    /// * `after` - Optional cursor, the id of the last artist already seen
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok((Vec<Artist>, Option<String>))` - Artists and optional next cursor
    /// - `Err(reqwest::Error)` - Network error, API error, or other
    ///   HTTP-related error
    pub async fn followed_artists(
        &mut self,
        limit: u64,
        after: Option<String>,
    ) -> Result<(Vec<Artist>, Option<String>), reqwest::Error> {
        loop {
            let token = self.token_mgr.get_valid_token(&self.config).await;

            let mut api_url = format!(
                "{uri}/me/following?type=artist&limit={limit}",
                uri = &self.config.api_url,
                limit = limit
            );
            if let Some(after_val) = &after {
                api_url.push_str(&format!("&after={}", after_val));
            }

            let client = Client::new();
            let response = client.get(&api_url).bearer_auth(token).send().await;

            let response = match response {
                Ok(resp) => match resp.error_for_status() {
                    Ok(valid_response) => valid_response,
                    Err(err) => {
                        if let Some(status) = err.status() {
                            if status == StatusCode::BAD_GATEWAY {
                                sleep(Duration::from_secs(10)).await;
                                continue; // retry
                            }
                        }
                        return Err(err); // propagate other errors
                    }
                },
                Err(err) => {
                    return Err(err);
                } // network or reqwest error
            };

            let res = response.json::<FollowedArtistsResponse>().await?;
            let next_after = res.artists.cursors.and_then(|c| c.after);

            return Ok((res.artists.items, next_after));
        }
    }
}
