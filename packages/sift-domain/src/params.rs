//! Lenient parsing of list query-string parameters.
//!
//! Malformed paging input is clamped or dropped, never rejected: list URLs are client-controlled
//! and deep-linked.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagingLimits {
	pub default_limit: u32,
	pub max_limit: u32,
	pub max_cursor_chars: usize,
}
impl Default for PagingLimits {
	fn default() -> Self {
		Self { default_limit: 10, max_limit: 100, max_cursor_chars: 1_024 }
	}
}

const RESERVED: [&str; 6] = ["q", "sortBy", "sortDir", "limit", "cursor", "page"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListParams {
	pub search: Option<String>,
	/// Every non-reserved parameter. Views pick out the ones they recognize.
	pub filters: BTreeMap<String, String>,
	pub sort_by: Option<String>,
	pub sort_dir: Option<String>,
	/// Always within `1..=max_limit`.
	pub limit: u32,
	pub cursor: Option<String>,
	/// Always at least 1.
	pub page: u32,
}
impl ListParams {
	pub fn new(limits: &PagingLimits) -> Self {
		Self {
			search: None,
			filters: BTreeMap::new(),
			sort_by: None,
			sort_dir: None,
			limit: limits.default_limit,
			cursor: None,
			page: 1,
		}
	}

	pub fn from_query<I, K, V>(pairs: I, limits: &PagingLimits) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut params = Self::new(limits);

		for (key, value) in pairs {
			let (key, value) = (key.as_ref(), value.as_ref());

			match key {
				"q" => params.search = non_empty(value),
				"sortBy" => params.sort_by = non_empty(value),
				"sortDir" => params.sort_dir = non_empty(value),
				"limit" => params.limit = parse_limit(value, limits),
				"cursor" => params.cursor = non_empty(value),
				"page" => params.page = parse_page(value),
				_ => {
					params.filters.insert(key.to_string(), value.to_string());
				},
			}
		}

		params
	}

	/// Inverse of [`ListParams::from_query`], omitting defaults that carry no information.
	pub fn to_query(&self) -> Vec<(String, String)> {
		let mut out = Vec::new();

		if let Some(search) = &self.search {
			out.push(("q".to_string(), search.clone()));
		}

		for (key, value) in &self.filters {
			if !RESERVED.contains(&key.as_str()) {
				out.push((key.clone(), value.clone()));
			}
		}

		if let Some(sort_by) = &self.sort_by {
			out.push(("sortBy".to_string(), sort_by.clone()));
		}
		if let Some(sort_dir) = &self.sort_dir {
			out.push(("sortDir".to_string(), sort_dir.clone()));
		}

		out.push(("limit".to_string(), self.limit.to_string()));

		if let Some(cursor) = &self.cursor {
			out.push(("cursor".to_string(), cursor.clone()));
		}
		if self.page > 1 {
			out.push(("page".to_string(), self.page.to_string()));
		}

		out
	}
}

fn non_empty(raw: &str) -> Option<String> {
	let trimmed = raw.trim();

	if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn parse_limit(raw: &str, limits: &PagingLimits) -> u32 {
	match raw.trim().parse::<i64>() {
		Ok(value) => value.clamp(1, i64::from(limits.max_limit.max(1))) as u32,
		Err(_) => limits.default_limit,
	}
}

fn parse_page(raw: &str) -> u32 {
	match raw.trim().parse::<i64>() {
		Ok(value) => value.clamp(1, i64::from(u32::MAX)) as u32,
		Err(_) => 1,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(pairs: &[(&str, &str)]) -> ListParams {
		ListParams::from_query(pairs.iter().copied(), &PagingLimits::default())
	}

	#[test]
	fn limit_is_clamped_and_defaults_on_garbage() {
		assert_eq!(parse(&[]).limit, 10);
		assert_eq!(parse(&[("limit", "0")]).limit, 1);
		assert_eq!(parse(&[("limit", "-4")]).limit, 1);
		assert_eq!(parse(&[("limit", "500")]).limit, 100);
		assert_eq!(parse(&[("limit", "ten")]).limit, 10);
		assert_eq!(parse(&[("limit", " 25 ")]).limit, 25);
	}

	#[test]
	fn page_is_floored_at_one() {
		assert_eq!(parse(&[("page", "0")]).page, 1);
		assert_eq!(parse(&[("page", "-9")]).page, 1);
		assert_eq!(parse(&[("page", "abc")]).page, 1);
		assert_eq!(parse(&[("page", "3")]).page, 3);
	}

	#[test]
	fn blank_values_are_absent_and_unknown_keys_become_filters() {
		let params = parse(&[("q", "  "), ("cursor", ""), ("categoryId", "c1"), ("status", "open")]);

		assert_eq!(params.search, None);
		assert_eq!(params.cursor, None);
		assert_eq!(params.filters.get("categoryId").map(String::as_str), Some("c1"));
		assert_eq!(params.filters.len(), 2);
	}

	#[test]
	fn to_query_round_trips_meaningful_parameters() {
		let params = parse(&[("q", "rust"), ("sortBy", "salary"), ("page", "2"), ("status", "OPEN")]);
		let again = ListParams::from_query(params.to_query(), &PagingLimits::default());

		assert_eq!(again, params);
	}
}
