//! Store-facing query shape, paging metadata, and the list response envelope.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	cursor::PageCursor,
	predicate::Predicate,
	sort::{SortDirection, SortSpec},
	value::{ListRecord, Value},
};

/// Composite ordering `[field DIR, id DIR]`. The id tie-break makes the order total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
	pub field: &'static str,
	pub direction: SortDirection,
}
impl Order {
	pub fn from_sort(sort: &SortSpec) -> Self {
		Self { field: sort.field, direction: sort.direction }
	}

	pub fn compare<R>(&self, a: &R, b: &R) -> Ordering
	where
		R: ListRecord + ?Sized,
	{
		let ascending = a
			.value(self.field)
			.cmp(&b.value(self.field))
			.then_with(|| a.record_id().cmp(&b.record_id()));

		match self.direction {
			SortDirection::Asc => ascending,
			SortDirection::Desc => ascending.reverse(),
		}
	}
}

/// "Strictly after this composite key" in the given direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyset {
	pub field: &'static str,
	pub value: Value,
	pub id: Uuid,
	pub direction: SortDirection,
}
impl Keyset {
	pub fn after(order: Order, cursor: PageCursor) -> Self {
		Self {
			field: order.field,
			value: cursor.sort_value,
			id: cursor.tie_break_id,
			direction: order.direction,
		}
	}

	pub fn admits<R>(&self, record: &R) -> bool
	where
		R: ListRecord + ?Sized,
	{
		let ord = record
			.value(self.field)
			.cmp(&self.value)
			.then_with(|| record.record_id().cmp(&self.id));

		match self.direction {
			SortDirection::Asc => ord == Ordering::Greater,
			SortDirection::Desc => ord == Ordering::Less,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
	Limit(u32),
	Offset { skip: u64, take: u32 },
}

/// One bounded, ordered fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchQuery {
	pub predicate: Predicate,
	pub order: Order,
	pub after: Option<Keyset>,
	pub window: Window,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PagingRequest {
	Cursor { after: Option<PageCursor>, limit: u32 },
	Offset { page: u32, limit: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPaging {
	/// `None` at the end of the list.
	pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPaging {
	pub page: u32,
	pub total: u64,
	pub total_pages: u64,
	pub has_more: bool,
}
impl OffsetPaging {
	/// `total_pages = max(1, ceil(total / limit))`, `has_more = page < total_pages`.
	pub fn compute(page: u32, limit: u32, total: u64) -> Self {
		let page = page.max(1);
		let limit = u64::from(limit.max(1));
		let total_pages = total.div_ceil(limit).max(1);

		Self { page, total, total_pages, has_more: u64::from(page) < total_pages }
	}

	pub fn skip(page: u32, limit: u32) -> u64 {
		u64::from(page.max(1) - 1) * u64::from(limit)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Paging {
	Cursor(CursorPaging),
	Offset(OffsetPaging),
}
impl Paging {
	/// True when no further page exists.
	pub fn is_terminal(&self) -> bool {
		match self {
			Self::Cursor(paging) => paging.next_cursor.is_none(),
			Self::Offset(paging) => !paging.has_more,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageResult<R> {
	pub items: Vec<R>,
	pub paging: Paging,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
	pub limit: u32,
	pub sort_by: String,
	pub sort_dir: SortDirection,
	pub paging: Paging,
}

/// `{ data, meta }` envelope shared by every list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<R> {
	pub data: Vec<R>,
	pub meta: PageMeta,
}
impl<R> ListResponse<R> {
	pub fn from_page(page: PageResult<R>, sort: &SortSpec, limit: u32) -> Self {
		Self {
			data: page.items,
			meta: PageMeta {
				limit,
				sort_by: sort.key.to_string(),
				sort_dir: sort.direction,
				paging: page.paging,
			},
		}
	}
}
