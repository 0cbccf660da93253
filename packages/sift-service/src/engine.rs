//! The Page Executor.
//!
//! Cursor mode fetches `limit + 1` rows strictly after the decoded keyset. The extra row only
//! proves that another page exists; the next cursor is anchored on the last row handed out.
//!
//! Offset mode fetches one `skip/take` window and counts the same predicate value separately.
//! It is not stable under concurrent inserts or deletes between page fetches: a record can be
//! skipped or repeated across pages. Only non-recency sorts use it.

use sift_domain::{
	CursorCodec, CursorPaging, FetchQuery, Keyset, ListParams, ListRecord, OffsetPaging, Order,
	PageResult, Paging, PagingMode, PagingRequest, Predicate, SortSpec, Window,
};

use crate::{Result, store::RecordStore};

/// Maps request parameters to a paging request under the resolved sort.
///
/// A cursor that fails to decode for any reason, including one issued under another sort, is
/// discarded and the first page is served.
pub fn resolve_paging(
	codec: &CursorCodec<'_>,
	sort: &SortSpec,
	params: &ListParams,
	limit: u32,
) -> PagingRequest {
	match sort.mode {
		PagingMode::Cursor => {
			let after = params.cursor.as_deref().and_then(|token| match codec.decode(token) {
				Ok(cursor) => Some(cursor),
				Err(err) => {
					tracing::debug!(
						sort_by = sort.key,
						sort_dir = sort.direction.as_str(),
						error = %err,
						"Discarding undecodable cursor; serving the first page."
					);

					None
				},
			});

			PagingRequest::Cursor { after, limit }
		},
		PagingMode::Offset => PagingRequest::Offset { page: params.page.max(1), limit },
	}
}

pub async fn execute<R>(
	store: &dyn RecordStore<R>,
	codec: &CursorCodec<'_>,
	predicate: Predicate,
	sort: &SortSpec,
	paging: PagingRequest,
) -> Result<PageResult<R>>
where
	R: ListRecord,
{
	let order = Order::from_sort(sort);

	match paging {
		PagingRequest::Cursor { after, limit } => {
			let limit = limit.max(1);
			let query = FetchQuery {
				predicate,
				order,
				after: after.map(|cursor| Keyset::after(order, cursor)),
				window: Window::Limit(limit.saturating_add(1)),
			};
			let mut items = store.fetch(&query).await?;
			let has_more = items.len() > limit as usize;

			items.truncate(limit as usize);

			let next_cursor = match items.last() {
				Some(record) if has_more => Some(codec.encode_record(record)?),
				_ => None,
			};

			Ok(PageResult { items, paging: Paging::Cursor(CursorPaging { next_cursor }) })
		},
		PagingRequest::Offset { page, limit } => {
			let page = page.max(1);
			let limit = limit.max(1);
			let query = FetchQuery {
				predicate,
				order,
				after: None,
				window: Window::Offset { skip: OffsetPaging::skip(page, limit), take: limit },
			};
			let items = store.fetch(&query).await?;
			let total = store.count(&query.predicate).await?;

			Ok(PageResult {
				items,
				paging: Paging::Offset(OffsetPaging::compute(page, limit, total)),
			})
		},
	}
}

/// Fetches a single page of at most `take` rows in `sort` order without paging metadata.
pub async fn first_rows<R>(
	store: &dyn RecordStore<R>,
	predicate: Predicate,
	sort: &SortSpec,
	take: u32,
) -> Result<Vec<R>>
where
	R: ListRecord,
{
	let order = Order::from_sort(sort);
	let query = FetchQuery { predicate, order, after: None, window: Window::Limit(take) };

	store.fetch(&query).await
}
