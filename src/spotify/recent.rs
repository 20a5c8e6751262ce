use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{spotify::Session, types::RecentlyPlayedResponse, warning};

/// Outcome of one recently-played fetch call.
///
/// The service sometimes answers with a degenerate `cursors` object that
/// carries no advance marker (typically when nothing new was played). That
/// case is a regular outcome here, not an error; the caller keeps its
/// previous cursor.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Batch plus a new `after` cursor to resume from next run.
    Advanced {
        batch: RecentlyPlayedResponse,
        after: String,
    },
    /// Batch without an advance marker; the previous cursor stays valid.
    NoCursor { batch: RecentlyPlayedResponse },
}

impl FetchOutcome {
    pub fn batch(&self) -> &RecentlyPlayedResponse {
        match self {
            FetchOutcome::Advanced { batch, .. } => batch,
            FetchOutcome::NoCursor { batch } => batch,
        }
    }

    pub fn after(&self) -> Option<&str> {
        match self {
            FetchOutcome::Advanced { after, .. } => Some(after),
            FetchOutcome::NoCursor { .. } => None,
        }
    }
}

impl Session {
    /// Retrieves one page of the user's recently played tracks.
    ///
    /// Passes the stored cursor as the `after` filter so only events newer
    /// than the last run are returned; without a cursor the service returns
    /// the most recent events unbounded. Handles rate limiting and retries
    /// automatically for 502 Bad Gateway responses.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of play events to return (1-50)
    /// * `after` - Optional cursor marking the latest event already seen
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(FetchOutcome)` - The batch, tagged with or without a new cursor
    /// - `Err(reqwest::Error)` - Network error, API error, or other
    ///   HTTP-related error
    pub async fn recently_played(
        &mut self,
        limit: u64,
        after: Option<String>,
    ) -> Result<FetchOutcome, reqwest::Error> {
        loop {
            let token = self.token_mgr.get_valid_token(&self.config).await;

            let mut api_url = format!(
                "{uri}/me/player/recently-played?limit={limit}",
                uri = &self.config.api_url,
                limit = limit
            );
            if let Some(after_val) = &after {
                api_url.push_str(&format!("&after={}", after_val));
            }

            let client = Client::new();
            let response = client.get(&api_url).bearer_auth(token).send().await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                if let Some(retry_after) = response.headers().get("retry-after") {
                    let retry_after = retry_after
                        .to_str()
                        .unwrap_or("0")
                        .parse::<u64>()
                        .unwrap_or(0);
                    if retry_after <= 120 {
                        sleep(Duration::from_secs(retry_after)).await;
                        continue; // retry
                    }
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds. Try your best tomorrow again.",
                        retry_after
                    );
                }
            }

            let response = match response.error_for_status() {
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
            };

            let batch = response.json::<RecentlyPlayedResponse>().await?;
            let next_after = batch.cursors.as_ref().and_then(|c| c.after.clone());

            return Ok(match next_after {
                Some(after) => FetchOutcome::Advanced { batch, after },
                None => FetchOutcome::NoCursor { batch },
            });
        }
    }
}
