//! Closed predicate tree shared by the in-memory evaluator and the SQL translator.

use serde_json::Value as Json;

use crate::value::{ListRecord, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
	FieldEquals { field: &'static str, value: Value },
	/// Membership. Against an id-set field this means the two sets intersect.
	FieldIn { field: &'static str, values: Vec<Value> },
	FieldIsNull { field: &'static str },
	FieldContainsInsensitive { field: &'static str, needle: String },
	/// Empty `And` is true.
	And(Vec<Predicate>),
	/// Empty `Or` is false.
	Or(Vec<Predicate>),
	Not(Box<Predicate>),
}
impl Predicate {
	pub fn always() -> Self {
		Self::And(Vec::new())
	}

	pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
		Self::FieldEquals { field, value: value.into() }
	}

	pub fn is_in<I, V>(field: &'static str, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		Self::FieldIn { field, values: values.into_iter().map(Into::into).collect() }
	}

	pub fn is_null(field: &'static str) -> Self {
		Self::FieldIsNull { field }
	}

	pub fn contains(field: &'static str, needle: impl Into<String>) -> Self {
		Self::FieldContainsInsensitive { field, needle: needle.into() }
	}

	pub fn negate(inner: Self) -> Self {
		Self::Not(Box::new(inner))
	}

	/// Conjunction that flattens nested `And`s and drops members that are always true.
	pub fn and<I>(parts: I) -> Self
	where
		I: IntoIterator<Item = Self>,
	{
		let mut flat = Vec::new();

		for part in parts {
			match part {
				Self::And(inner) => flat.extend(inner),
				other => flat.push(other),
			}
		}

		if flat.len() == 1 { flat.remove(0) } else { Self::And(flat) }
	}

	pub fn or<I>(parts: I) -> Self
	where
		I: IntoIterator<Item = Self>,
	{
		let mut flat = Vec::new();

		for part in parts {
			match part {
				Self::Or(inner) => flat.extend(inner),
				other => flat.push(other),
			}
		}

		if flat.len() == 1 { flat.remove(0) } else { Self::Or(flat) }
	}

	pub fn is_always(&self) -> bool {
		matches!(self, Self::And(parts) if parts.is_empty())
	}

	pub fn matches<R>(&self, record: &R) -> bool
	where
		R: ListRecord + ?Sized,
	{
		match self {
			Self::FieldEquals { field, value: Value::Null } | Self::FieldIsNull { field } =>
				record.value(field).is_null(),
			Self::FieldEquals { field, value } => record.value(field) == *value,
			Self::FieldIn { field, values } => match record.value(field) {
				Value::IdSet(ids) =>
					values.iter().any(|value| matches!(value, Value::Id(id) if ids.contains(id))),
				Value::Null => false,
				other => values.contains(&other),
			},
			Self::FieldContainsInsensitive { field, needle } => match record.value(field) {
				Value::Text(text) => text.to_lowercase().contains(&needle.to_lowercase()),
				_ => false,
			},
			Self::And(parts) => parts.iter().all(|part| part.matches(record)),
			Self::Or(parts) => parts.iter().any(|part| part.matches(record)),
			Self::Not(inner) => !inner.matches(record),
		}
	}

	/// Every field name referenced anywhere in the tree, in first-seen order.
	pub fn fields(&self) -> Vec<&'static str> {
		let mut out = Vec::new();

		self.collect_fields(&mut out);

		out
	}

	/// JSON rendering for logs.
	pub fn to_value(&self) -> Json {
		match self {
			Self::FieldEquals { field, value } =>
				serde_json::json!({ "op": "eq", "field": field, "value": value }),
			Self::FieldIn { field, values } =>
				serde_json::json!({ "op": "in", "field": field, "value": values }),
			Self::FieldIsNull { field } => serde_json::json!({ "op": "is_null", "field": field }),
			Self::FieldContainsInsensitive { field, needle } =>
				serde_json::json!({ "op": "contains", "field": field, "value": needle }),
			Self::And(parts) => serde_json::json!({
				"op": "and",
				"args": Json::Array(parts.iter().map(Self::to_value).collect()),
			}),
			Self::Or(parts) => serde_json::json!({
				"op": "or",
				"args": Json::Array(parts.iter().map(Self::to_value).collect()),
			}),
			Self::Not(inner) => serde_json::json!({ "op": "not", "expr": inner.to_value() }),
		}
	}

	fn collect_fields(&self, out: &mut Vec<&'static str>) {
		match self {
			Self::FieldEquals { field, .. }
			| Self::FieldIn { field, .. }
			| Self::FieldIsNull { field }
			| Self::FieldContainsInsensitive { field, .. } =>
				if !out.contains(field) {
					out.push(*field);
				},
			Self::And(parts) | Self::Or(parts) =>
				for part in parts {
					part.collect_fields(out);
				},
			Self::Not(inner) => inner.collect_fields(out),
		}
	}
}

#[cfg(test)]
mod tests {
	use uuid::Uuid;

	use super::*;

	struct Row {
		id: Uuid,
		title: &'static str,
		tags: Vec<Uuid>,
		archived: Option<i64>,
	}
	impl ListRecord for Row {
		fn record_id(&self) -> Uuid {
			self.id
		}

		fn value(&self, field: &str) -> Value {
			match field {
				"id" => Value::Id(self.id),
				"title" => Value::from(self.title),
				"tags" => Value::IdSet(self.tags.clone()),
				"archived" => Value::from(self.archived),
				_ => Value::Null,
			}
		}
	}

	fn row() -> Row {
		Row {
			id: Uuid::from_u128(7),
			title: "Senior Rust Engineer",
			tags: vec![Uuid::from_u128(1)],
			archived: None,
		}
	}

	#[test]
	fn empty_and_is_true_and_empty_or_is_false() {
		assert!(Predicate::always().matches(&row()));
		assert!(!Predicate::Or(Vec::new()).matches(&row()));
	}

	#[test]
	fn contains_ignores_case() {
		assert!(Predicate::contains("title", "rust ENG").matches(&row()));
		assert!(!Predicate::contains("title", "golang").matches(&row()));
	}

	#[test]
	fn in_against_id_set_means_intersection() {
		let hit = Predicate::is_in("tags", [Uuid::from_u128(9), Uuid::from_u128(1)]);
		let miss = Predicate::is_in("tags", [Uuid::from_u128(9)]);

		assert!(hit.matches(&row()));
		assert!(!miss.matches(&row()));
		assert!(!Predicate::is_in("tags", Vec::<Uuid>::new()).matches(&row()));
	}

	#[test]
	fn equals_null_behaves_as_is_null() {
		assert!(Predicate::eq("archived", Value::Null).matches(&row()));
		assert!(Predicate::is_null("archived").matches(&row()));
		assert!(!Predicate::negate(Predicate::is_null("archived")).matches(&row()));
	}

	#[test]
	fn and_flattens_and_drops_trivial_members() {
		let nested = Predicate::and([
			Predicate::always(),
			Predicate::and([Predicate::is_null("archived"), Predicate::eq("title", "x")]),
		]);

		assert_eq!(
			nested,
			Predicate::And(vec![Predicate::is_null("archived"), Predicate::eq("title", "x")])
		);
		assert_eq!(Predicate::and([Predicate::always()]), Predicate::always());
		assert_eq!(nested.fields(), vec!["archived", "title"]);
	}
}
