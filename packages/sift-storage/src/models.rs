use time::OffsetDateTime;
use uuid::Uuid;

/// A job joined with its skill tags and live application count.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct JobRow {
	pub job_id: Uuid,
	pub title: String,
	pub description: String,
	pub company_name: String,
	pub location: String,
	pub category_id: Option<Uuid>,
	pub status: String,
	pub salary: Option<i64>,
	pub created_at: OffsetDateTime,
	pub archived_at: Option<OffsetDateTime>,
	pub deleted_at: Option<OffsetDateTime>,
	pub skill_ids: Vec<Uuid>,
	/// Derived. Ignored on insert.
	pub application_count: i64,
}

/// An application joined with the title and company of its job.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ApplicationRow {
	pub application_id: Uuid,
	pub job_id: Uuid,
	pub applicant_id: String,
	pub status: String,
	pub cover_letter: String,
	pub created_at: OffsetDateTime,
	pub withdrawn_at: Option<OffsetDateTime>,
	/// Derived. Ignored on insert.
	pub job_title: String,
	/// Derived. Ignored on insert.
	pub company_name: String,
}
