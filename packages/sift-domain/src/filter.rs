use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
	predicate::Predicate,
	view::{FilterKind, FilterParam, ViewSpec},
};

/// Search text beyond this many characters is ignored.
pub const MAX_SEARCH_CHARS: usize = 256;

/// Trims search text; whitespace-only text means "no search", never "match nothing".
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
	let trimmed = raw?.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.chars().take(MAX_SEARCH_CHARS).collect())
}

/// Composes a view's base predicate with explicit filters and free-text search.
pub struct FilterBuilder<'a> {
	view: &'a ViewSpec,
}
impl<'a> FilterBuilder<'a> {
	pub fn new(view: &'a ViewSpec) -> Self {
		Self { view }
	}

	pub fn build(
		&self,
		base: Predicate,
		explicit: &BTreeMap<String, String>,
		search: Option<&str>,
	) -> Predicate {
		let mut parts = vec![base];

		parts.extend(self.explicit_clauses(explicit));
		parts.extend(self.search_clause(search));

		Predicate::and(parts)
	}

	/// One equality per recognized, non-empty, well-formed filter, in view order. Anything
	/// else is dropped.
	pub fn explicit_clauses(&self, explicit: &BTreeMap<String, String>) -> Vec<Predicate> {
		self.view
			.filters
			.iter()
			.filter_map(|filter| {
				let raw = explicit.get(filter.param)?.trim();

				if raw.is_empty() {
					return None;
				}

				filter_clause(filter, raw)
			})
			.collect()
	}

	/// Case-insensitive substring match OR'ed across the view's search fields.
	pub fn search_clause(&self, search: Option<&str>) -> Option<Predicate> {
		let needle = normalize_search(search)?;

		Some(Predicate::or(
			self.view
				.search_fields
				.iter()
				.map(|field| Predicate::contains(*field, needle.clone())),
		))
	}
}

fn filter_clause(filter: &FilterParam, raw: &str) -> Option<Predicate> {
	match filter.kind {
		FilterKind::Id => Uuid::parse_str(raw).ok().map(|id| Predicate::eq(filter.field, id)),
		FilterKind::Enum(allowed) => allowed
			.iter()
			.find(|value| value.eq_ignore_ascii_case(raw))
			.map(|value| Predicate::eq(filter.field, *value)),
		FilterKind::Text => Some(Predicate::eq(filter.field, raw)),
	}
}
