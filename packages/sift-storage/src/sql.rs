//! Translation of domain fetch queries into parameterized Postgres SQL.
//!
//! Every value is a bound parameter. Field names resolve through a static per-view column map,
//! so an unmapped field is an error rather than an injection point.

use sift_domain::{
	FetchQuery, Keyset, Order, Predicate, SortDirection, Value, Window, views::fields,
};
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug)]
pub enum Column {
	/// Scalar SQL expression.
	Scalar(&'static str),
	/// Text column. Ordered bytewise (`COLLATE "C"`), matched case-insensitively with `ILIKE`.
	Text(&'static str),
	/// Ids linked through a join table. Only membership tests apply.
	IdSet { table: &'static str, owner: &'static str, outer: &'static str, member: &'static str },
}

/// SQL shape of one listable entity.
#[derive(Debug)]
pub struct SqlView {
	pub select: &'static str,
	pub count: &'static str,
	pub columns: &'static [(&'static str, Column)],
}
impl SqlView {
	pub fn column(&self, field: &str) -> Result<Column> {
		self.columns
			.iter()
			.find(|(name, _)| *name == field)
			.map(|(_, column)| *column)
			.ok_or_else(|| Error::InvalidArgument(format!("Unknown field {field:?}.")))
	}

	fn id_expr(&self) -> Result<&'static str> {
		match self.column(fields::ID)? {
			Column::Scalar(expr) | Column::Text(expr) => Ok(expr),
			Column::IdSet { .. } =>
				Err(Error::InvalidArgument("The id field must be scalar.".to_string())),
		}
	}
}

const APPLICATION_COUNT: &str = "\
(SELECT COUNT(*) FROM applications ac WHERE ac.job_id = j.job_id AND ac.withdrawn_at IS NULL)";

pub static JOBS: SqlView = SqlView {
	select: "\
SELECT
	j.job_id,
	j.title,
	j.description,
	j.company_name,
	j.location,
	j.category_id,
	j.status,
	j.salary,
	j.created_at,
	j.archived_at,
	j.deleted_at,
	ARRAY(SELECT js.skill_id FROM job_skills js WHERE js.job_id = j.job_id ORDER BY js.skill_id) AS skill_ids,
	(SELECT COUNT(*) FROM applications ac WHERE ac.job_id = j.job_id AND ac.withdrawn_at IS NULL) AS application_count
FROM jobs j",
	count: "SELECT COUNT(*) FROM jobs j",
	columns: &[
		(fields::ID, Column::Scalar("j.job_id")),
		(fields::TITLE, Column::Text("j.title")),
		(fields::DESCRIPTION, Column::Text("j.description")),
		(fields::COMPANY_NAME, Column::Text("j.company_name")),
		(fields::LOCATION, Column::Text("j.location")),
		(fields::CATEGORY_ID, Column::Scalar("j.category_id")),
		(fields::STATUS, Column::Text("j.status")),
		(fields::SALARY, Column::Scalar("j.salary")),
		(fields::CREATED_AT, Column::Scalar("j.created_at")),
		(fields::ARCHIVED_AT, Column::Scalar("j.archived_at")),
		(fields::DELETED_AT, Column::Scalar("j.deleted_at")),
		(
			fields::SKILL_IDS,
			Column::IdSet {
				table: "job_skills js",
				owner: "js.job_id",
				outer: "j.job_id",
				member: "js.skill_id",
			},
		),
		(fields::APPLICATION_COUNT, Column::Scalar(APPLICATION_COUNT)),
	],
};

pub static APPLICATIONS: SqlView = SqlView {
	select: "\
SELECT
	a.application_id,
	a.job_id,
	a.applicant_id,
	a.status,
	a.cover_letter,
	a.created_at,
	a.withdrawn_at,
	j.title AS job_title,
	j.company_name
FROM applications a
JOIN jobs j ON j.job_id = a.job_id",
	count: "\
SELECT COUNT(*)
FROM applications a
JOIN jobs j ON j.job_id = a.job_id",
	columns: &[
		(fields::ID, Column::Scalar("a.application_id")),
		(fields::JOB_ID, Column::Scalar("a.job_id")),
		(fields::APPLICANT_ID, Column::Text("a.applicant_id")),
		(fields::STATUS, Column::Text("a.status")),
		(fields::COVER_LETTER, Column::Text("a.cover_letter")),
		(fields::CREATED_AT, Column::Scalar("a.created_at")),
		(fields::WITHDRAWN_AT, Column::Scalar("a.withdrawn_at")),
		(fields::JOB_TITLE, Column::Text("j.title")),
		(fields::COMPANY_NAME, Column::Text("j.company_name")),
	],
};

/// `SELECT … WHERE <predicate> [AND <keyset>] ORDER BY … LIMIT … [OFFSET …]`.
pub fn fetch_query(
	view: &SqlView,
	query: &FetchQuery,
) -> Result<QueryBuilder<'static, Postgres>> {
	let mut builder = QueryBuilder::new(view.select);

	builder.push(" WHERE ");
	push_predicate(&mut builder, view, &query.predicate)?;

	if let Some(keyset) = &query.after {
		builder.push(" AND ");
		push_keyset(&mut builder, view, keyset)?;
	}

	push_order(&mut builder, view, query.order)?;
	push_window(&mut builder, query.window);

	Ok(builder)
}

/// `SELECT COUNT(*) … WHERE <predicate>`.
pub fn count_query(
	view: &SqlView,
	predicate: &Predicate,
) -> Result<QueryBuilder<'static, Postgres>> {
	let mut builder = QueryBuilder::new(view.count);

	builder.push(" WHERE ");
	push_predicate(&mut builder, view, predicate)?;

	Ok(builder)
}

pub fn push_predicate(
	builder: &mut QueryBuilder<'static, Postgres>,
	view: &SqlView,
	predicate: &Predicate,
) -> Result<()> {
	match predicate {
		Predicate::FieldEquals { field, value: Value::Null } | Predicate::FieldIsNull { field } => {
			let expr = scalar_expr(view, field)?;

			builder.push(format!("({expr} IS NULL)"));
		},
		Predicate::FieldEquals { field, value } => {
			let expr = scalar_expr(view, field)?;

			builder.push(format!("({expr} = "));
			push_value(builder, value)?;
			builder.push(")");
		},
		Predicate::FieldIn { values, .. } if values.is_empty() => {
			builder.push("FALSE");
		},
		Predicate::FieldIn { field, values } => match view.column(field)? {
			Column::IdSet { table, owner, outer, member } => {
				builder.push(format!(
					"EXISTS (SELECT 1 FROM {table} WHERE {owner} = {outer} AND {member} = ANY("
				));
				builder.push_bind(id_list(field, values)?);
				builder.push("))");
			},
			Column::Scalar(expr) | Column::Text(expr) => {
				builder.push(format!("({expr} = ANY("));
				push_value_list(builder, field, values)?;
				builder.push("))");
			},
		},
		Predicate::FieldContainsInsensitive { field, needle } => {
			let expr = match view.column(field)? {
				Column::Text(expr) => expr,
				_ =>
					return Err(Error::InvalidArgument(format!(
						"Field {field:?} is not a text column."
					))),
			};

			builder.push(format!("({expr} ILIKE "));
			builder.push_bind(format!("%{}%", escape_like(needle)));
			builder.push(" ESCAPE '\\')");
		},
		Predicate::And(parts) => push_group(builder, view, parts, " AND ", "TRUE")?,
		Predicate::Or(parts) => push_group(builder, view, parts, " OR ", "FALSE")?,
		// Collapse NULL to false first so negation stays two-valued.
		Predicate::Not(inner) => {
			builder.push("(NOT COALESCE(");
			push_predicate(builder, view, inner)?;
			builder.push(", FALSE))");
		},
	}

	Ok(())
}

/// `LIKE` pattern with `%`, `_`, and `\` taken literally.
pub fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

fn push_group(
	builder: &mut QueryBuilder<'static, Postgres>,
	view: &SqlView,
	parts: &[Predicate],
	separator: &str,
	empty: &str,
) -> Result<()> {
	if parts.is_empty() {
		builder.push(empty);

		return Ok(());
	}

	builder.push("(");

	for (idx, part) in parts.iter().enumerate() {
		if idx > 0 {
			builder.push(separator);
		}

		push_predicate(builder, view, part)?;
	}

	builder.push(")");

	Ok(())
}

fn push_keyset(
	builder: &mut QueryBuilder<'static, Postgres>,
	view: &SqlView,
	keyset: &Keyset,
) -> Result<()> {
	if keyset.value.is_null() {
		return Err(Error::InvalidArgument("Keyset sort value must not be null.".to_string()));
	}

	let expr = sort_expr(view, keyset.field)?;
	let op = match keyset.direction {
		SortDirection::Asc => ">",
		SortDirection::Desc => "<",
	};

	builder.push(format!("({expr}, {}) {op} (", view.id_expr()?));
	push_value(builder, &keyset.value)?;
	builder.push(", ");
	builder.push_bind(keyset.id);
	builder.push(")");

	Ok(())
}

fn push_order(
	builder: &mut QueryBuilder<'static, Postgres>,
	view: &SqlView,
	order: Order,
) -> Result<()> {
	// Nulls rank lowest, as in the in-memory ordering.
	let (dir, nulls) = match order.direction {
		SortDirection::Asc => ("ASC", "NULLS FIRST"),
		SortDirection::Desc => ("DESC", "NULLS LAST"),
	};

	builder.push(format!(
		" ORDER BY {} {dir} {nulls}, {} {dir}",
		sort_expr(view, order.field)?,
		view.id_expr()?
	));

	Ok(())
}

fn push_window(builder: &mut QueryBuilder<'static, Postgres>, window: Window) {
	match window {
		Window::Limit(take) => {
			builder.push(" LIMIT ");
			builder.push_bind(i64::from(take));
		},
		Window::Offset { skip, take } => {
			builder.push(" LIMIT ");
			builder.push_bind(i64::from(take));
			builder.push(" OFFSET ");
			builder.push_bind(i64::try_from(skip).unwrap_or(i64::MAX));
		},
	}
}

fn scalar_expr(view: &SqlView, field: &str) -> Result<&'static str> {
	match view.column(field)? {
		Column::Scalar(expr) | Column::Text(expr) => Ok(expr),
		Column::IdSet { .. } => Err(Error::InvalidArgument(format!(
			"Field {field:?} is a set and supports membership tests only."
		))),
	}
}

fn sort_expr(view: &SqlView, field: &str) -> Result<String> {
	match view.column(field)? {
		Column::Scalar(expr) => Ok(expr.to_string()),
		Column::Text(expr) => Ok(format!(r#"{expr} COLLATE "C""#)),
		Column::IdSet { .. } =>
			Err(Error::InvalidArgument(format!("Field {field:?} cannot be sorted on."))),
	}
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &Value) -> Result<()> {
	match value {
		Value::Text(text) => {
			builder.push_bind(text.clone());
		},
		Value::Int(int) => {
			builder.push_bind(*int);
		},
		Value::Time(at) => {
			builder.push_bind(*at);
		},
		Value::Id(id) => {
			builder.push_bind(*id);
		},
		Value::Null | Value::IdSet(_) =>
			return Err(Error::InvalidArgument(format!(
				"Value of kind {:?} cannot be compared directly.",
				value.kind()
			))),
	}

	Ok(())
}

fn push_value_list(
	builder: &mut QueryBuilder<'static, Postgres>,
	field: &str,
	values: &[Value],
) -> Result<()> {
	match values.first() {
		Some(Value::Id(_)) => {
			builder.push_bind(id_list(field, values)?);
		},
		Some(Value::Text(_)) => {
			builder.push_bind(collect(field, values, |value| value.as_text().map(str::to_string))?);
		},
		Some(Value::Int(_)) => {
			builder.push_bind(collect(field, values, |value| match value {
				Value::Int(int) => Some(*int),
				_ => None,
			})?);
		},
		Some(Value::Time(_)) => {
			builder.push_bind(collect::<OffsetDateTime>(field, values, |value| match value {
				Value::Time(at) => Some(*at),
				_ => None,
			})?);
		},
		_ =>
			return Err(Error::InvalidArgument(format!(
				"Field {field:?} has an unsupported membership list."
			))),
	}

	Ok(())
}

fn id_list(field: &str, values: &[Value]) -> Result<Vec<Uuid>> {
	collect(field, values, |value| match value {
		Value::Id(id) => Some(*id),
		_ => None,
	})
}

fn collect<T>(field: &str, values: &[Value], f: impl Fn(&Value) -> Option<T>) -> Result<Vec<T>> {
	values
		.iter()
		.map(|value| {
			f(value).ok_or_else(|| {
				Error::InvalidArgument(format!("Field {field:?} has a mixed membership list."))
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use sift_domain::{CandidateFilter, views};

	use super::*;

	fn job_fetch(predicate: Predicate, after: Option<Keyset>, window: Window) -> String {
		let order = Order::from_sort(&views::JOBS.default_sort());
		let query = FetchQuery { predicate, order, after, window };

		fetch_query(&JOBS, &query).expect("translates").sql().to_string()
	}

	#[test]
	fn like_metacharacters_are_escaped() {
		assert_eq!(escape_like(r"50%_off\now"), r"50\%\_off\\now");
	}

	#[test]
	fn base_filter_and_window_translate_with_binds() {
		let sql = job_fetch(views::feed_base(), None, Window::Limit(11));

		assert!(sql.contains(
			"WHERE ((j.deleted_at IS NULL) AND (j.archived_at IS NULL) AND (j.status = $1))"
		));
		assert!(sql.ends_with("ORDER BY j.created_at DESC NULLS LAST, j.job_id DESC LIMIT $2"));
	}

	#[test]
	fn keyset_is_a_row_value_comparison() {
		let keyset = Keyset {
			field: fields::CREATED_AT,
			value: Value::Time(OffsetDateTime::UNIX_EPOCH),
			id: Uuid::nil(),
			direction: SortDirection::Desc,
		};
		let sql = job_fetch(Predicate::always(), Some(keyset), Window::Limit(3));

		assert!(sql.contains("WHERE TRUE AND (j.created_at, j.job_id) < ($1, $2)"));
	}

	#[test]
	fn skill_membership_becomes_exists_and_exclusion_is_two_valued() {
		let candidates = CandidateFilter {
			include: Some(Predicate::is_in(fields::SKILL_IDS, [Uuid::from_u128(1)])),
			exclude_ids: [Uuid::from_u128(2)].into_iter().collect(),
		};
		let sql = job_fetch(candidates.apply(Predicate::always()), None, Window::Limit(1));

		assert!(sql.contains(
			"EXISTS (SELECT 1 FROM job_skills js WHERE js.job_id = j.job_id AND js.skill_id = ANY($1))"
		));
		assert!(sql.contains("(NOT COALESCE((j.job_id = ANY($2)), FALSE))"));
	}

	#[test]
	fn text_sorts_are_bytewise_and_offsets_are_bound() {
		let sort = views::JOBS.select(Some("title"), None);
		let query = FetchQuery {
			predicate: Predicate::always(),
			order: Order::from_sort(&sort),
			after: None,
			window: Window::Offset { skip: 20, take: 10 },
		};
		let sql = fetch_query(&JOBS, &query).expect("translates").sql().to_string();

		assert!(sql.ends_with(
			r#"ORDER BY j.title COLLATE "C" ASC NULLS FIRST, j.job_id ASC LIMIT $1 OFFSET $2"#
		));
	}

	#[test]
	fn unknown_fields_and_mixed_lists_are_rejected() {
		let unknown = count_query(&APPLICATIONS, &Predicate::eq(fields::SALARY, 1_i64));
		let mixed = count_query(
			&JOBS,
			&Predicate::FieldIn {
				field: fields::STATUS,
				values: vec![Value::from("OPEN"), Value::Int(1)],
			},
		);

		assert!(matches!(unknown, Err(Error::InvalidArgument(_))));
		assert!(matches!(mixed, Err(Error::InvalidArgument(_))));
	}
}
