//! Sort/paging strategy selection.
//!
//! Only a view's recency key is paged with cursors. Every other allow-listed key (text,
//! numeric, or aggregate count) is paged with counted offsets, because its values are neither
//! unique nor monotonic under insertion.

use serde::{Deserialize, Serialize};

use crate::{value::ValueKind, view::ViewSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	Asc,
	Desc,
}
impl SortDirection {
	/// Case-insensitive `asc`/`desc`; anything else is `None`.
	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		if raw.eq_ignore_ascii_case("asc") {
			Some(Self::Asc)
		} else if raw.eq_ignore_ascii_case("desc") {
			Some(Self::Desc)
		} else {
			None
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagingMode {
	Cursor,
	Offset,
}

/// One allow-listed sort key of a view.
#[derive(Clone, Copy, Debug)]
pub struct SortField {
	/// Public name, as sent in `sortBy`.
	pub key: &'static str,
	/// Record field the key orders by.
	pub field: &'static str,
	pub kind: ValueKind,
	pub default_direction: SortDirection,
}
impl SortField {
	pub const fn recency(key: &'static str, field: &'static str) -> Self {
		Self { key, field, kind: ValueKind::Time, default_direction: SortDirection::Desc }
	}

	pub const fn ascending(key: &'static str, field: &'static str, kind: ValueKind) -> Self {
		Self { key, field, kind, default_direction: SortDirection::Asc }
	}
}

/// The resolved sort for one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
	pub key: &'static str,
	pub field: &'static str,
	pub kind: ValueKind,
	pub direction: SortDirection,
	pub mode: PagingMode,
}

/// Resolves client-supplied sort parameters against a view.
///
/// Unknown keys fall back to the view's recency key and unparsable directions fall back to the
/// key's default direction. Neither is an error.
pub fn select(view: &ViewSpec, sort_by: Option<&str>, sort_dir: Option<&str>) -> SortSpec {
	let requested = sort_by.map(str::trim).filter(|key| !key.is_empty());
	let field = requested.and_then(|key| view.sort_field(key)).unwrap_or(view.recency);
	let direction = sort_dir.and_then(SortDirection::parse).unwrap_or(field.default_direction);
	let mode =
		if field.key == view.recency.key { PagingMode::Cursor } else { PagingMode::Offset };

	SortSpec { key: field.key, field: field.field, kind: field.kind, direction, mode }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::views;

	#[test]
	fn recency_defaults_to_newest_first_in_cursor_mode() {
		let spec = select(&views::JOBS, None, None);

		assert_eq!(spec.key, "createdAt");
		assert_eq!(spec.direction, SortDirection::Desc);
		assert_eq!(spec.mode, PagingMode::Cursor);
	}

	#[test]
	fn other_keys_default_to_ascending_offset_mode() {
		let spec = select(&views::JOBS, Some("salary"), None);

		assert_eq!(spec.field, "salary");
		assert_eq!(spec.direction, SortDirection::Asc);
		assert_eq!(spec.mode, PagingMode::Offset);

		let spec = select(&views::JOBS, Some("applicationCount"), Some("DESC"));

		assert_eq!(spec.direction, SortDirection::Desc);
		assert_eq!(spec.mode, PagingMode::Offset);
	}

	#[test]
	fn explicit_direction_overrides_recency_default() {
		let spec = select(&views::JOBS, Some("createdAt"), Some("asc"));

		assert_eq!(spec.direction, SortDirection::Asc);
		assert_eq!(spec.mode, PagingMode::Cursor);
	}

	#[test]
	fn unknown_key_and_direction_fall_back_silently() {
		let spec = select(&views::JOBS, Some("bogusField"), Some("sideways"));

		assert_eq!(spec.key, "createdAt");
		assert_eq!(spec.direction, SortDirection::Desc);
		assert_eq!(spec.mode, PagingMode::Cursor);
	}

	#[test]
	fn archived_view_pages_by_archive_time() {
		let spec = select(&views::ARCHIVED_JOBS, None, None);

		assert_eq!(spec.field, "archived_at");
		assert_eq!(spec.mode, PagingMode::Cursor);
		assert_eq!(select(&views::ARCHIVED_JOBS, Some("createdAt"), None).mode, PagingMode::Offset);
	}
}
