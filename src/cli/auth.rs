use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::ApiConfig, spotify, types::PkceToken};

pub async fn auth(config: ApiConfig, shared_state: Arc<Mutex<Option<PkceToken>>>) {
    spotify::auth::auth(config, shared_state).await;
}
