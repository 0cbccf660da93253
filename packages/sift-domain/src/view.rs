use crate::sort::{SortField, SortSpec};

/// How a raw explicit-filter parameter is interpreted.
#[derive(Clone, Copy, Debug)]
pub enum FilterKind {
	/// Must parse as a UUID.
	Id,
	/// Must match one of the listed values, case-insensitively. Stored upper case.
	Enum(&'static [&'static str]),
	/// Exact text match after trimming.
	Text,
}

#[derive(Clone, Copy, Debug)]
pub struct FilterParam {
	/// Query-string name, e.g. `categoryId`.
	pub param: &'static str,
	pub field: &'static str,
	pub kind: FilterKind,
}

/// Static description of one list view. One engine serves every view; views differ only in
/// this table and in the base predicate supplied per request.
#[derive(Clone, Copy, Debug)]
pub struct ViewSpec {
	/// Stable name. Part of every cursor signature issued for the view.
	pub name: &'static str,
	pub id_field: &'static str,
	/// Canonical recency order: the default sort and the only key paged by cursor.
	pub recency: SortField,
	/// Additional allow-listed sort keys, paged by offset.
	pub sort_fields: &'static [SortField],
	/// Text fields searched by `q`.
	pub search_fields: &'static [&'static str],
	pub filters: &'static [FilterParam],
}
impl ViewSpec {
	pub fn sort_field(&self, key: &str) -> Option<SortField> {
		if self.recency.key == key {
			return Some(self.recency);
		}

		self.sort_fields.iter().find(|field| field.key == key).copied()
	}

	pub fn allowed_sort_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
		std::iter::once(self.recency.key).chain(self.sort_fields.iter().map(|field| field.key))
	}

	pub fn select(&self, sort_by: Option<&str>, sort_dir: Option<&str>) -> SortSpec {
		crate::sort::select(self, sort_by, sort_dir)
	}

	pub fn default_sort(&self) -> SortSpec {
		self.select(None, None)
	}

	pub fn filter(&self, param: &str) -> Option<&FilterParam> {
		self.filters.iter().find(|filter| filter.param == param)
	}
}
