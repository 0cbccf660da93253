//! Storage seams of the engine.
//!
//! The engine speaks [`FetchQuery`] and [`Predicate`]; stores answer them. Postgres backs the
//! service in production, the in-memory store backs tests.

use std::{future::Future, pin::Pin, sync::Arc};

use sift_domain::{CallerProfile, FetchQuery, Predicate};
use sift_storage::{db::Db, queries};

use crate::{
	Result,
	items::{ApplicationItem, JobItem},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait RecordStore<R>
where
	Self: Send + Sync,
{
	/// Rows matching the query, in the query's order, within its window.
	fn fetch<'a>(&'a self, query: &'a FetchQuery) -> BoxFuture<'a, Result<Vec<R>>>;

	fn count<'a>(&'a self, predicate: &'a Predicate) -> BoxFuture<'a, Result<u64>>;
}

pub trait ProfileStore
where
	Self: Send + Sync,
{
	fn load_caller<'a>(&'a self, caller_id: &'a str) -> BoxFuture<'a, Result<CallerProfile>>;
}

#[derive(Clone)]
pub struct Stores {
	pub jobs: Arc<dyn RecordStore<JobItem>>,
	pub applications: Arc<dyn RecordStore<ApplicationItem>>,
	pub profiles: Arc<dyn ProfileStore>,
}
impl Stores {
	pub fn new(
		jobs: Arc<dyn RecordStore<JobItem>>,
		applications: Arc<dyn RecordStore<ApplicationItem>>,
		profiles: Arc<dyn ProfileStore>,
	) -> Self {
		Self { jobs, applications, profiles }
	}

	pub fn postgres(db: Db) -> Self {
		let stores = Arc::new(PgStores { db });

		Self { jobs: stores.clone(), applications: stores.clone(), profiles: stores }
	}
}

pub struct PgStores {
	db: Db,
}
impl PgStores {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}

impl RecordStore<JobItem> for PgStores {
	fn fetch<'a>(&'a self, query: &'a FetchQuery) -> BoxFuture<'a, Result<Vec<JobItem>>> {
		Box::pin(async move {
			let rows = queries::fetch_jobs(&self.db, query).await?;

			Ok(rows.into_iter().map(JobItem::from).collect())
		})
	}

	fn count<'a>(&'a self, predicate: &'a Predicate) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(queries::count_jobs(&self.db, predicate).await?) })
	}
}

impl RecordStore<ApplicationItem> for PgStores {
	fn fetch<'a>(&'a self, query: &'a FetchQuery) -> BoxFuture<'a, Result<Vec<ApplicationItem>>> {
		Box::pin(async move {
			let rows = queries::fetch_applications(&self.db, query).await?;

			Ok(rows.into_iter().map(ApplicationItem::from).collect())
		})
	}

	fn count<'a>(&'a self, predicate: &'a Predicate) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(queries::count_applications(&self.db, predicate).await?) })
	}
}

impl ProfileStore for PgStores {
	fn load_caller<'a>(&'a self, caller_id: &'a str) -> BoxFuture<'a, Result<CallerProfile>> {
		Box::pin(async move { Ok(queries::load_caller_profile(&self.db, caller_id).await?) })
	}
}
