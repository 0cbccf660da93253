use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A single field value as seen by predicates, sorting, and cursors.
///
/// Values of the same variant are totally ordered; `Null` sorts before everything else.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
	Null,
	Text(String),
	Int(i64),
	Time(#[serde(with = "crate::time_serde")] OffsetDateTime),
	Id(Uuid),
	IdSet(Vec<Uuid>),
}
impl Value {
	pub fn kind(&self) -> Option<ValueKind> {
		match self {
			Self::Null => None,
			Self::Text(_) => Some(ValueKind::Text),
			Self::Int(_) => Some(ValueKind::Int),
			Self::Time(_) => Some(ValueKind::Time),
			Self::Id(_) => Some(ValueKind::Id),
			Self::IdSet(_) => Some(ValueKind::IdSet),
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text.as_str()),
			_ => None,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}
impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}
impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<OffsetDateTime> for Value {
	fn from(value: OffsetDateTime) -> Self {
		Self::Time(value)
	}
}
impl From<Uuid> for Value {
	fn from(value: Uuid) -> Self {
		Self::Id(value)
	}
}
impl<T> From<Option<T>> for Value
where
	T: Into<Value>,
{
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Self::Null)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
	Text,
	Int,
	Time,
	Id,
	IdSet,
}
impl ValueKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Int => "int",
			Self::Time => "time",
			Self::Id => "id",
			Self::IdSet => "id_set",
		}
	}
}
impl Display for ValueKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A row that can be listed: it has a unique id and exposes its fields by name.
pub trait ListRecord {
	fn record_id(&self) -> Uuid;

	/// Returns `Value::Null` for unknown fields.
	fn value(&self, field: &str) -> Value;
}
