use std::collections::BTreeSet;

use sift_domain::{CallerContext, CallerProfile, FetchQuery, Predicate, SkillCatalog};
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{ApplicationRow, JobRow},
	sql,
};

pub async fn fetch_jobs(db: &Db, query: &FetchQuery) -> Result<Vec<JobRow>> {
	let mut builder = sql::fetch_query(&sql::JOBS, query)?;
	let rows = builder.build_query_as::<JobRow>().fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn count_jobs(db: &Db, predicate: &Predicate) -> Result<u64> {
	let mut builder = sql::count_query(&sql::JOBS, predicate)?;
	let count = builder.build_query_scalar::<i64>().fetch_one(&db.pool).await?;

	Ok(count.max(0) as u64)
}

pub async fn fetch_applications(db: &Db, query: &FetchQuery) -> Result<Vec<ApplicationRow>> {
	let mut builder = sql::fetch_query(&sql::APPLICATIONS, query)?;
	let rows = builder.build_query_as::<ApplicationRow>().fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn count_applications(db: &Db, predicate: &Predicate) -> Result<u64> {
	let mut builder = sql::count_query(&sql::APPLICATIONS, predicate)?;
	let count = builder.build_query_scalar::<i64>().fetch_one(&db.pool).await?;

	Ok(count.max(0) as u64)
}

/// Skills, the categories they imply, and every job the caller applied to.
///
/// Withdrawn applications still count as acted on.
pub async fn load_caller_profile(db: &Db, caller_id: &str) -> Result<CallerProfile> {
	let skill_ids: Vec<Uuid> =
		sqlx::query_scalar("SELECT skill_id FROM user_skills WHERE user_id = $1")
			.bind(caller_id)
			.fetch_all(&db.pool)
			.await?;
	let catalog: Vec<(Uuid, Uuid)> = sqlx::query_as(
		"\
SELECT skill_id, category_id
FROM skills
WHERE category_id IS NOT NULL
	AND skill_id = ANY($1)",
	)
	.bind(skill_ids.as_slice())
	.fetch_all(&db.pool)
	.await?;
	let applied: Vec<(Uuid, Option<Uuid>)> = sqlx::query_as(
		"\
SELECT a.job_id, j.category_id
FROM applications a
JOIN jobs j ON j.job_id = a.job_id
WHERE a.applicant_id = $1",
	)
	.bind(caller_id)
	.fetch_all(&db.pool)
	.await?;
	let context = CallerContext {
		caller_id: Some(caller_id.to_string()),
		skill_ids: skill_ids.into_iter().collect(),
		applied_category_ids: applied.iter().filter_map(|(_, category)| *category).collect(),
		excluded_record_ids: applied.iter().map(|(job_id, _)| *job_id).collect::<BTreeSet<_>>(),
	};

	Ok(CallerProfile { context, catalog: catalog.into_iter().collect::<SkillCatalog>() })
}

pub async fn insert_category(db: &Db, category_id: Uuid, name: &str) -> Result<()> {
	sqlx::query("INSERT INTO categories (category_id, name) VALUES ($1, $2)")
		.bind(category_id)
		.bind(name)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn insert_skill(
	db: &Db,
	skill_id: Uuid,
	name: &str,
	category_id: Option<Uuid>,
) -> Result<()> {
	sqlx::query("INSERT INTO skills (skill_id, name, category_id) VALUES ($1, $2, $3)")
		.bind(skill_id)
		.bind(name)
		.bind(category_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

/// Inserts the job and its skill tags in one transaction.
pub async fn insert_job(db: &Db, job: &JobRow) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO jobs (
	job_id,
	title,
	description,
	company_name,
	location,
	category_id,
	status,
	salary,
	created_at,
	archived_at,
	deleted_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(job.job_id)
	.bind(job.title.as_str())
	.bind(job.description.as_str())
	.bind(job.company_name.as_str())
	.bind(job.location.as_str())
	.bind(job.category_id)
	.bind(job.status.as_str())
	.bind(job.salary)
	.bind(job.created_at)
	.bind(job.archived_at)
	.bind(job.deleted_at)
	.execute(&mut *tx)
	.await?;

	for skill_id in &job.skill_ids {
		sqlx::query("INSERT INTO job_skills (job_id, skill_id) VALUES ($1, $2)")
			.bind(job.job_id)
			.bind(*skill_id)
			.execute(&mut *tx)
			.await?;
	}

	tx.commit().await?;

	Ok(())
}

pub async fn insert_application(db: &Db, application: &ApplicationRow) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO applications (
	application_id,
	job_id,
	applicant_id,
	status,
	cover_letter,
	created_at,
	withdrawn_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(application.application_id)
	.bind(application.job_id)
	.bind(application.applicant_id.as_str())
	.bind(application.status.as_str())
	.bind(application.cover_letter.as_str())
	.bind(application.created_at)
	.bind(application.withdrawn_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_user_skill(db: &Db, user_id: &str, skill_id: Uuid) -> Result<()> {
	sqlx::query("INSERT INTO user_skills (user_id, skill_id) VALUES ($1, $2)")
		.bind(user_id)
		.bind(skill_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}
