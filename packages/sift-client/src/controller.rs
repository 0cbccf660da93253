//! The List Client Controller as a pure state machine.
//!
//! The caller owns an immutable [`ControllerState`] snapshot. [`ListController::plan`] turns an
//! intent into the next snapshot plus the request to issue, and [`ListController::reconcile`]
//! folds the outcome of that request back into whatever snapshot is current when it lands.
//! Nothing is read from shared mutable state, so a late callback can never observe a paging
//! position other than the one it was handed.
//!
//! The engine decides the paging mode from the sort key, so the controller learns it from the
//! first response and pages accordingly: cursor mode keeps a stack of the cursors it came from,
//! offset mode moves the page number.

use sift_domain::{ListParams, ListResponse, Paging};

use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagingStyle {
	/// Pages accumulate as the user scrolls. There is no previous page.
	InfiniteScroll,
	/// One page at a time, replaced on every move.
	Paged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
	/// Reload the first page of the current query.
	Reset,
	/// Debounced search text. Blank text clears the search.
	Search(String),
	SetSort {
		sort_by: Option<String>,
		sort_dir: Option<String>,
	},
	/// `None` or blank removes the filter.
	SetFilter {
		key: String,
		value: Option<String>,
	},
	Next,
	Previous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
	/// First page of a new generation.
	Fresh,
	Next,
	Previous,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedRequest {
	/// Generation of the snapshot that planned this request.
	pub generation: u64,
	pub step: Step,
	pub params: ListParams,
}

#[derive(Clone, Debug)]
pub struct ControllerState<T> {
	/// Search, filters, sort and limit. Cursor and page are always cleared here.
	pub query: ListParams,
	pub generation: u64,
	pub in_flight: bool,
	pub items: Vec<T>,
	/// Cursor that fetched the current page, `None` on the first one.
	pub cursor: Option<String>,
	/// Cursors of the pages before the current one, oldest first.
	pub cursor_stack: Vec<Option<String>>,
	/// One-based position of the current page.
	pub page: u32,
	/// Paging metadata of the last response applied.
	pub paging: Option<Paging>,
	pub last_error: Option<String>,
}
impl<T> ControllerState<T> {
	pub fn new(query: ListParams) -> Self {
		Self {
			query: without_position(query),
			generation: 0,
			in_flight: false,
			items: Vec::new(),
			cursor: None,
			cursor_stack: Vec::new(),
			page: 1,
			paging: None,
			last_error: None,
		}
	}

	/// True once a response said there is nothing after the current page.
	pub fn is_terminal(&self) -> bool {
		self.paging.as_ref().is_some_and(Paging::is_terminal)
	}

	pub fn has_previous(&self) -> bool {
		match self.paging {
			Some(Paging::Cursor(_)) => !self.cursor_stack.is_empty(),
			Some(Paging::Offset(_)) => self.page > 1,
			None => false,
		}
	}
}

#[derive(Clone, Copy, Debug)]
pub struct ListController {
	style: PagingStyle,
}
impl ListController {
	pub fn new(style: PagingStyle) -> Self {
		Self { style }
	}

	pub fn style(&self) -> PagingStyle {
		self.style
	}

	/// Returns `None` when the intent cannot be served from this snapshot: a move while a
	/// request is outstanding, `Next` after a terminal page, or `Previous` with nowhere to go.
	pub fn plan<T>(
		&self,
		state: &ControllerState<T>,
		intent: Intent,
	) -> Option<(ControllerState<T>, PlannedRequest)>
	where
		T: Clone,
	{
		let mut query = state.query.clone();

		match intent {
			Intent::Reset => {},
			Intent::Search(text) => query.search = non_blank(Some(text)),
			Intent::SetSort { sort_by, sort_dir } => {
				query.sort_by = non_blank(sort_by);
				query.sort_dir = non_blank(sort_dir);
			},
			Intent::SetFilter { key, value } => match non_blank(value) {
				Some(value) => {
					query.filters.insert(key, value);
				},
				None => {
					query.filters.remove(&key);
				},
			},
			Intent::Next => return self.next(state),
			Intent::Previous => return self.previous(state),
		}

		Some(fresh(state, query))
	}

	/// Applies the outcome of `request` to `state`.
	///
	/// Responses planned under an older generation are dropped. Failures keep items and position
	/// and only record the error.
	pub fn reconcile<T>(
		&self,
		state: &ControllerState<T>,
		request: &PlannedRequest,
		result: Result<ListResponse<T>>,
	) -> ControllerState<T>
	where
		T: Clone,
	{
		if request.generation != state.generation {
			tracing::debug!(
				stale = request.generation,
				current = state.generation,
				"Ignoring response from a superseded query."
			);

			return state.clone();
		}

		let mut next = state.clone();

		next.in_flight = false;

		let response = match result {
			Ok(response) => response,
			Err(err) => {
				next.last_error = Some(err.to_string());

				return next;
			},
		};

		next.last_error = None;

		match &response.meta.paging {
			Paging::Cursor(_) => {
				match request.step {
					Step::Fresh => next.cursor_stack.clear(),
					Step::Next => next.cursor_stack.push(state.cursor.clone()),
					Step::Previous => {
						next.cursor_stack.pop();
					},
				}

				next.cursor = request.params.cursor.clone();
				next.page = u32::try_from(next.cursor_stack.len())
					.unwrap_or(u32::MAX)
					.saturating_add(1);
			},
			Paging::Offset(paging) => {
				next.cursor = None;
				next.cursor_stack.clear();
				next.page = paging.page;
			},
		}

		if request.step == Step::Next && self.style == PagingStyle::InfiniteScroll {
			next.items.extend(response.data);
		} else {
			next.items = response.data;
		}

		next.paging = Some(response.meta.paging);

		next
	}

	fn next<T>(&self, state: &ControllerState<T>) -> Option<(ControllerState<T>, PlannedRequest)>
	where
		T: Clone,
	{
		if state.in_flight {
			return None;
		}

		let mut params = state.query.clone();

		match state.paging.as_ref()? {
			Paging::Cursor(paging) => params.cursor = Some(paging.next_cursor.clone()?),
			Paging::Offset(paging) if paging.has_more => params.page = state.page.saturating_add(1),
			Paging::Offset(_) => return None,
		}

		Some(dispatch(state, Step::Next, params))
	}

	fn previous<T>(
		&self,
		state: &ControllerState<T>,
	) -> Option<(ControllerState<T>, PlannedRequest)>
	where
		T: Clone,
	{
		if state.in_flight || self.style == PagingStyle::InfiniteScroll || !state.has_previous() {
			return None;
		}

		let mut params = state.query.clone();

		match state.paging.as_ref()? {
			Paging::Cursor(_) => params.cursor = state.cursor_stack.last()?.clone(),
			Paging::Offset(_) => params.page = state.page - 1,
		}

		Some(dispatch(state, Step::Previous, params))
	}
}

/// New generation: position and accumulated items are discarded before the request goes out.
fn fresh<T>(state: &ControllerState<T>, query: ListParams) -> (ControllerState<T>, PlannedRequest) {
	let next = ControllerState {
		generation: state.generation + 1,
		in_flight: true,
		..ControllerState::new(query)
	};
	let request = PlannedRequest {
		generation: next.generation,
		step: Step::Fresh,
		params: next.query.clone(),
	};

	(next, request)
}

fn dispatch<T>(
	state: &ControllerState<T>,
	step: Step,
	params: ListParams,
) -> (ControllerState<T>, PlannedRequest)
where
	T: Clone,
{
	let mut next = state.clone();

	next.in_flight = true;

	(next, PlannedRequest { generation: state.generation, step, params })
}

fn without_position(mut query: ListParams) -> ListParams {
	query.cursor = None;
	query.page = 1;

	query
}

fn non_blank(raw: Option<String>) -> Option<String> {
	raw.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	use sift_domain::{CursorPaging, OffsetPaging, PageMeta, PagingLimits, SortDirection};

	use super::*;
	use crate::Error;

	fn params() -> ListParams {
		ListParams::new(&PagingLimits::default())
	}

	fn cursor_page(data: Vec<u32>, next_cursor: Option<&str>) -> Result<ListResponse<u32>> {
		Ok(ListResponse {
			data,
			meta: PageMeta {
				limit: 10,
				sort_by: "createdAt".to_string(),
				sort_dir: SortDirection::Desc,
				paging: Paging::Cursor(CursorPaging {
					next_cursor: next_cursor.map(str::to_string),
				}),
			},
		})
	}

	fn offset_page(data: Vec<u32>, page: u32, total: u64) -> Result<ListResponse<u32>> {
		Ok(ListResponse {
			data,
			meta: PageMeta {
				limit: 2,
				sort_by: "salary".to_string(),
				sort_dir: SortDirection::Asc,
				paging: Paging::Offset(OffsetPaging::compute(page, 2, total)),
			},
		})
	}

	fn failure() -> Result<ListResponse<u32>> {
		Err(Error::Status { status: 500, body: "boom".to_string() })
	}

	fn step(
		controller: &ListController,
		state: &ControllerState<u32>,
		intent: Intent,
		outcome: Result<ListResponse<u32>>,
	) -> ControllerState<u32> {
		let (pending, request) = controller.plan(state, intent).expect("intent must be planned");

		controller.reconcile(&pending, &request, outcome)
	}

	#[test]
	fn paged_cursor_mode_walks_forward_and_back_through_the_stack() {
		let controller = ListController::new(PagingStyle::Paged);
		let state = ControllerState::new(params());

		assert!(controller.plan(&state, Intent::Next).is_none());

		let first = step(&controller, &state, Intent::Reset, cursor_page(vec![1, 2], Some("c1")));

		assert!(!first.has_previous());
		assert!(controller.plan(&first, Intent::Previous).is_none());

		let (_, request) = controller.plan(&first, Intent::Next).expect("next is planned");

		assert_eq!(request.params.cursor.as_deref(), Some("c1"));

		let second = step(&controller, &first, Intent::Next, cursor_page(vec![3, 4], Some("c2")));
		let third = step(&controller, &second, Intent::Next, cursor_page(vec![5], None));

		assert_eq!(third.items, vec![5]);
		assert_eq!(third.page, 3);
		assert!(third.is_terminal());
		assert!(controller.plan(&third, Intent::Next).is_none());

		let (_, request) = controller.plan(&third, Intent::Previous).expect("previous is planned");

		assert_eq!(request.params.cursor.as_deref(), Some("c1"));

		let back = step(&controller, &third, Intent::Previous, cursor_page(vec![3, 4], Some("c2")));

		assert_eq!(back.items, vec![3, 4]);
		assert_eq!(back.page, 2);

		let (_, request) = controller.plan(&back, Intent::Previous).expect("previous is planned");

		assert_eq!(request.params.cursor, None);
	}

	#[test]
	fn infinite_scroll_appends_and_has_no_previous() {
		let controller = ListController::new(PagingStyle::InfiniteScroll);
		let state = ControllerState::new(params());
		let first = step(&controller, &state, Intent::Reset, cursor_page(vec![1, 2], Some("c1")));
		let second = step(&controller, &first, Intent::Next, cursor_page(vec![3], None));

		assert_eq!(second.items, vec![1, 2, 3]);
		assert!(controller.plan(&second, Intent::Previous).is_none());
		assert!(controller.plan(&second, Intent::Next).is_none());
	}

	#[test]
	fn moves_are_refused_while_a_request_is_in_flight() {
		let controller = ListController::new(PagingStyle::Paged);
		let state = ControllerState::new(params());
		let first = step(&controller, &state, Intent::Reset, cursor_page(vec![1], Some("c1")));
		let (pending, _) = controller.plan(&first, Intent::Next).expect("next is planned");

		assert!(pending.in_flight);
		assert!(controller.plan(&pending, Intent::Next).is_none());
		assert!(controller.plan(&pending, Intent::Previous).is_none());
	}

	#[test]
	fn new_query_discards_position_and_ignores_stale_responses() {
		let controller = ListController::new(PagingStyle::InfiniteScroll);
		let state = ControllerState::new(params());
		let first = step(&controller, &state, Intent::Reset, cursor_page(vec![1, 2], Some("c1")));
		let (scrolling, stale) = controller.plan(&first, Intent::Next).expect("next is planned");
		let (searching, request) = controller
			.plan(&scrolling, Intent::Search("  rust ".to_string()))
			.expect("search is planned");

		assert!(searching.items.is_empty());
		assert_eq!(searching.generation, first.generation + 1);
		assert_eq!(request.params.search.as_deref(), Some("rust"));
		assert_eq!(request.params.cursor, None);

		let ignored = controller.reconcile(&searching, &stale, cursor_page(vec![3], None));

		assert!(ignored.items.is_empty());
		assert!(ignored.in_flight);

		let done = controller.reconcile(&searching, &request, cursor_page(vec![9], None));

		assert_eq!(done.items, vec![9]);
		assert!(!done.in_flight);
	}

	#[test]
	fn failures_keep_items_and_position() {
		let controller = ListController::new(PagingStyle::Paged);
		let state = ControllerState::new(params());
		let first = step(&controller, &state, Intent::Reset, cursor_page(vec![1, 2], Some("c1")));
		let failed = step(&controller, &first, Intent::Next, failure());

		assert_eq!(failed.items, vec![1, 2]);
		assert_eq!(failed.page, 1);
		assert!(!failed.in_flight);
		assert!(failed.last_error.as_deref().is_some_and(|err| err.contains("500")));

		let retried = step(&controller, &failed, Intent::Next, cursor_page(vec![3], None));

		assert_eq!(retried.items, vec![3]);
		assert_eq!(retried.last_error, None);
	}

	#[test]
	fn offset_mode_moves_the_page_number() {
		let controller = ListController::new(PagingStyle::Paged);
		let state = ControllerState::new(params());
		let sorted = step(
			&controller,
			&state,
			Intent::SetSort {
				sort_by: Some("salary".to_string()),
				sort_dir: Some("asc".to_string()),
			},
			offset_page(vec![1, 2], 1, 5),
		);
		let (_, request) = controller.plan(&sorted, Intent::Next).expect("next is planned");

		assert_eq!(request.params.page, 2);
		assert_eq!(request.params.sort_by.as_deref(), Some("salary"));

		let second = step(&controller, &sorted, Intent::Next, offset_page(vec![3, 4], 2, 5));
		let third = step(&controller, &second, Intent::Next, offset_page(vec![5], 3, 5));

		assert_eq!(third.page, 3);
		assert!(third.is_terminal());
		assert!(controller.plan(&third, Intent::Next).is_none());

		let (_, request) = controller.plan(&third, Intent::Previous).expect("previous is planned");

		assert_eq!(request.params.page, 2);
	}

	#[test]
	fn set_filter_inserts_and_blank_removes() {
		let controller = ListController::new(PagingStyle::Paged);
		let state = ControllerState::<u32>::new(params());
		let (with_filter, request) = controller
			.plan(
				&state,
				Intent::SetFilter { key: "status".to_string(), value: Some("OPEN".to_string()) },
			)
			.expect("filter is planned");

		assert_eq!(request.params.filters.get("status").map(String::as_str), Some("OPEN"));

		let (_, request) = controller
			.plan(
				&with_filter,
				Intent::SetFilter { key: "status".to_string(), value: Some(" ".to_string()) },
			)
			.expect("filter is planned");

		assert!(request.params.filters.is_empty());
	}
}
