//! In-memory stores that evaluate predicates with the same semantics as the SQL translation.

use std::{
	collections::HashMap,
	future,
	sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use uuid::Uuid;

use sift_domain::{CallerContext, CallerProfile, FetchQuery, ListRecord, Predicate, Window};

use crate::{
	Result,
	store::{BoxFuture, ProfileStore, RecordStore},
};

pub struct MemoryStore<R> {
	records: RwLock<Vec<R>>,
}
impl<R> MemoryStore<R>
where
	R: ListRecord + Clone + Send + Sync,
{
	pub fn new(records: Vec<R>) -> Self {
		Self { records: RwLock::new(records) }
	}

	pub fn insert(&self, record: R) {
		self.write().push(record);
	}

	/// Applies `update` to the record with `id`. Returns whether one was found.
	pub fn update<F>(&self, id: Uuid, update: F) -> bool
	where
		F: FnOnce(&mut R),
	{
		match self.write().iter_mut().find(|record| record.record_id() == id) {
			Some(record) => {
				update(record);

				true
			},
			None => false,
		}
	}

	pub fn len(&self) -> usize {
		self.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.read().is_empty()
	}

	fn select(&self, query: &FetchQuery) -> Vec<R> {
		let records = self.read();
		let mut matched = records
			.iter()
			.filter(|record| query.predicate.matches(*record))
			.filter(|record| query.after.as_ref().is_none_or(|after| after.admits(*record)))
			.collect::<Vec<_>>();

		matched.sort_by(|a, b| query.order.compare(*a, *b));

		let (skip, take) = match query.window {
			Window::Limit(take) => (0, take as usize),
			Window::Offset { skip, take } =>
				(usize::try_from(skip).unwrap_or(usize::MAX), take as usize),
		};

		matched.into_iter().skip(skip).take(take).cloned().collect()
	}

	fn read(&self) -> RwLockReadGuard<'_, Vec<R>> {
		self.records.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write(&self) -> RwLockWriteGuard<'_, Vec<R>> {
		self.records.write().unwrap_or_else(|err| err.into_inner())
	}
}
impl<R> Default for MemoryStore<R> {
	fn default() -> Self {
		Self { records: RwLock::new(Vec::new()) }
	}
}

impl<R> RecordStore<R> for MemoryStore<R>
where
	R: ListRecord + Clone + Send + Sync,
{
	fn fetch<'a>(&'a self, query: &'a FetchQuery) -> BoxFuture<'a, Result<Vec<R>>> {
		Box::pin(future::ready(Ok(self.select(query))))
	}

	fn count<'a>(&'a self, predicate: &'a Predicate) -> BoxFuture<'a, Result<u64>> {
		let count = self.read().iter().filter(|record| predicate.matches(*record)).count();

		Box::pin(future::ready(Ok(count as u64)))
	}
}

/// Profiles keyed by caller id. Unknown callers have no skills and no history.
#[derive(Default)]
pub struct MemoryProfiles {
	profiles: RwLock<HashMap<String, CallerProfile>>,
}
impl MemoryProfiles {
	pub fn insert(&self, profile: CallerProfile) {
		let Some(caller_id) = profile.context.caller_id.clone() else {
			return;
		};

		self.profiles.write().unwrap_or_else(|err| err.into_inner()).insert(caller_id, profile);
	}
}

impl ProfileStore for MemoryProfiles {
	fn load_caller<'a>(&'a self, caller_id: &'a str) -> BoxFuture<'a, Result<CallerProfile>> {
		let profile = self
			.profiles
			.read()
			.unwrap_or_else(|err| err.into_inner())
			.get(caller_id)
			.cloned()
			.unwrap_or_else(|| CallerProfile {
				context: CallerContext {
					caller_id: Some(caller_id.to_string()),
					..CallerContext::default()
				},
				..CallerProfile::default()
			});

		Box::pin(future::ready(Ok(profile)))
	}
}
