pub mod applications;
pub mod engine;
pub mod items;
pub mod jobs;
pub mod memory;
pub mod store;

mod error;

pub use error::{Error, Result};
pub use items::{ApplicationItem, JobItem, RelatedJobs};
pub use memory::{MemoryProfiles, MemoryStore};
pub use store::{BoxFuture, PgStores, ProfileStore, RecordStore, Stores};

use sift_config::Config;
use sift_domain::{
	CursorCodec, FilterBuilder, ListParams, ListRecord, ListResponse, PagingLimits, Predicate,
	ViewSpec,
};
use sift_storage::db::Db;

pub struct SiftService {
	pub cfg: Config,
	pub stores: Stores,
}
impl SiftService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, stores: Stores::postgres(db) }
	}

	pub fn with_stores(cfg: Config, stores: Stores) -> Self {
		Self { cfg, stores }
	}

	/// Bounds for parsing list query parameters.
	pub fn paging_limits(&self) -> PagingLimits {
		PagingLimits {
			default_limit: self.cfg.paging.default_limit,
			max_limit: self.cfg.paging.max_limit,
			max_cursor_chars: self.cfg.paging.max_cursor_chars,
		}
	}

	/// Base predicate plus the request's explicit filters and search text.
	pub(crate) fn filtered(view: &ViewSpec, base: Predicate, params: &ListParams) -> Predicate {
		FilterBuilder::new(view).build(base, &params.filters, params.search.as_deref())
	}

	/// Resolves sort and paging for `view` and runs one page of `predicate`.
	pub(crate) async fn run_list<R>(
		&self,
		store: &dyn RecordStore<R>,
		view: &ViewSpec,
		predicate: Predicate,
		params: &ListParams,
	) -> Result<ListResponse<R>>
	where
		R: ListRecord,
	{
		let limit = params.limit.clamp(1, self.cfg.paging.max_limit.max(1));
		let sort = view.select(params.sort_by.as_deref(), params.sort_dir.as_deref());
		let codec = CursorCodec::new(view, sort, self.cfg.paging.max_cursor_chars);
		let paging = engine::resolve_paging(&codec, &sort, params, limit);
		let page = engine::execute(store, &codec, predicate, &sort, paging).await?;

		Ok(ListResponse::from_page(page, &sort, limit))
	}
}
