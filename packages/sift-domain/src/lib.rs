//! List query domain: views, predicates, sort selection, cursors, and the response envelope.
//!
//! Everything here is storage-agnostic. Stores receive a [`FetchQuery`] and answer it.

pub mod assemble;
pub mod cursor;
pub mod filter;
pub mod page;
pub mod params;
pub mod predicate;
pub mod recommend;
pub mod sort;
pub mod time_serde;
pub mod value;
pub mod view;
pub mod views;

pub use assemble::merge;
pub use cursor::{CursorCodec, CursorDecodeError, CursorEncodeError, PageCursor};
pub use filter::{FilterBuilder, MAX_SEARCH_CHARS, normalize_search};
pub use page::{
	CursorPaging, FetchQuery, Keyset, ListResponse, OffsetPaging, Order, PageMeta, PageResult,
	Paging, PagingRequest, Window,
};
pub use params::{ListParams, PagingLimits};
pub use predicate::Predicate;
pub use recommend::{CallerContext, CallerProfile, CandidateBuilder, CandidateFilter, SkillCatalog};
pub use sort::{PagingMode, SortDirection, SortField, SortSpec};
pub use value::{ListRecord, Value, ValueKind};
pub use view::{FilterKind, FilterParam, ViewSpec};
