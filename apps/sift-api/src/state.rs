use std::sync::Arc;

use sift_config::Config;
use sift_service::{SiftService, Stores};
use sift_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SiftService>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self { service: Arc::new(SiftService::new(config, db)) })
	}

	/// State over caller-supplied stores, e.g. in-memory ones.
	pub fn with_stores(config: Config, stores: Stores) -> Self {
		Self { service: Arc::new(SiftService::with_stores(config, stores)) }
	}
}
