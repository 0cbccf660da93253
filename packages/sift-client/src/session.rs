//! Async driver that owns one controller snapshot and a source.
//!
//! A session issues at most one request at a time: every dispatch awaits its response before
//! returning, so the in-flight guard of the controller only matters to callers that plan by hand.

use std::sync::Arc;

use tokio::time::{self, Duration, Instant};

use sift_domain::ListParams;

use crate::{ControllerState, Intent, ListController, ListSource, SearchDebouncer};

pub struct Session<T> {
	controller: ListController,
	source: Arc<dyn ListSource<T>>,
	state: ControllerState<T>,
	debouncer: SearchDebouncer,
}
impl<T> Session<T>
where
	T: Clone,
{
	pub fn new(
		controller: ListController,
		source: Arc<dyn ListSource<T>>,
		query: ListParams,
		search_delay: Duration,
	) -> Self {
		Self {
			controller,
			source,
			state: ControllerState::new(query),
			debouncer: SearchDebouncer::new(search_delay),
		}
	}

	pub fn state(&self) -> &ControllerState<T> {
		&self.state
	}

	/// Plans `intent`, fetches, and reconciles. Returns whether a request was issued.
	pub async fn dispatch(&mut self, intent: Intent) -> bool {
		let Some((pending, request)) = self.controller.plan(&self.state, intent) else {
			return false;
		};

		self.state = pending;

		let result = self.source.fetch(&request).await;

		if let Err(err) = &result {
			tracing::warn!(error = %err, generation = request.generation, "List request failed.");
		}

		self.state = self.controller.reconcile(&self.state, &request, result);

		true
	}

	/// Records search text as typed. Nothing is sent until [`Session::settle_search`].
	pub fn type_search(&mut self, text: impl Into<String>) {
		self.debouncer.push(text, Instant::now());
	}

	/// Waits out the quiet period of the latest typed text, then searches with it.
	pub async fn settle_search(&mut self) -> bool {
		let Some(deadline) = self.debouncer.deadline() else {
			return false;
		};

		time::sleep_until(deadline).await;

		match self.debouncer.ready(Instant::now()) {
			Some(text) => self.dispatch(Intent::Search(text)).await,
			None => false,
		}
	}
}
