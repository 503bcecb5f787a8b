use std::sync::Arc;

use crate::config::Config;
use crate::db::Repository;
use crate::error::Result;
use crate::reconcile::Engine;
use crate::upstream::ProviderClient;

pub struct AppState {
    pub config: Config,
    pub engine: Engine,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let repo = Repository::new(&config.db_path).await?;
        let provider = ProviderClient::new(&config);

        Ok(Arc::new(Self {
            engine: Engine::new(repo, provider),
            config,
        }))
    }
}
