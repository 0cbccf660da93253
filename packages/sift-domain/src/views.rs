//! The recruiting list views and their base predicates.

use crate::{
	predicate::Predicate,
	sort::SortField,
	value::ValueKind,
	view::{FilterKind, FilterParam, ViewSpec},
};

pub mod fields {
	pub const ID: &str = "id";
	pub const TITLE: &str = "title";
	pub const DESCRIPTION: &str = "description";
	pub const COMPANY_NAME: &str = "company_name";
	pub const LOCATION: &str = "location";
	pub const CATEGORY_ID: &str = "category_id";
	pub const STATUS: &str = "status";
	pub const SALARY: &str = "salary";
	pub const CREATED_AT: &str = "created_at";
	pub const ARCHIVED_AT: &str = "archived_at";
	pub const DELETED_AT: &str = "deleted_at";
	pub const SKILL_IDS: &str = "skill_ids";
	pub const APPLICATION_COUNT: &str = "application_count";

	pub const JOB_ID: &str = "job_id";
	pub const APPLICANT_ID: &str = "applicant_id";
	pub const COVER_LETTER: &str = "cover_letter";
	pub const WITHDRAWN_AT: &str = "withdrawn_at";
	pub const JOB_TITLE: &str = "job_title";
}

pub const JOB_STATUSES: &[&str] = &["OPEN", "CLOSED", "PAUSED"];
pub const JOB_STATUS_OPEN: &str = "OPEN";
pub const APPLICATION_STATUSES: &[&str] = &["PENDING", "REVIEWED", "ACCEPTED", "REJECTED"];

const JOB_SEARCH_FIELDS: &[&str] =
	&[fields::TITLE, fields::DESCRIPTION, fields::COMPANY_NAME, fields::LOCATION];

const JOBS_SPEC: ViewSpec = ViewSpec {
	name: "jobs",
	id_field: fields::ID,
	recency: SortField::recency("createdAt", fields::CREATED_AT),
	sort_fields: &[
		SortField::ascending("title", fields::TITLE, ValueKind::Text),
		SortField::ascending("companyName", fields::COMPANY_NAME, ValueKind::Text),
		SortField::ascending("location", fields::LOCATION, ValueKind::Text),
		SortField::ascending("salary", fields::SALARY, ValueKind::Int),
		SortField::ascending("applicationCount", fields::APPLICATION_COUNT, ValueKind::Int),
	],
	search_fields: JOB_SEARCH_FIELDS,
	filters: &[
		FilterParam { param: "categoryId", field: fields::CATEGORY_ID, kind: FilterKind::Id },
		FilterParam {
			param: "status",
			field: fields::STATUS,
			kind: FilterKind::Enum(JOB_STATUSES),
		},
	],
};

pub static JOBS: ViewSpec = JOBS_SPEC;

/// Recommendation mode over jobs. Shares the jobs table but signs its own cursors.
pub static FEED: ViewSpec = ViewSpec { name: "feed", ..JOBS_SPEC };

pub static ARCHIVED_JOBS: ViewSpec = ViewSpec {
	name: "archived_jobs",
	id_field: fields::ID,
	recency: SortField::recency("archivedAt", fields::ARCHIVED_AT),
	sort_fields: &[
		SortField::ascending("createdAt", fields::CREATED_AT, ValueKind::Time),
		SortField::ascending("title", fields::TITLE, ValueKind::Text),
		SortField::ascending("companyName", fields::COMPANY_NAME, ValueKind::Text),
		SortField::ascending("salary", fields::SALARY, ValueKind::Int),
	],
	search_fields: JOB_SEARCH_FIELDS,
	filters: &[FilterParam {
		param: "categoryId",
		field: fields::CATEGORY_ID,
		kind: FilterKind::Id,
	}],
};

pub static APPLICATIONS: ViewSpec = ViewSpec {
	name: "applications",
	id_field: fields::ID,
	recency: SortField::recency("createdAt", fields::CREATED_AT),
	sort_fields: &[
		SortField::ascending("status", fields::STATUS, ValueKind::Text),
		SortField::ascending("jobTitle", fields::JOB_TITLE, ValueKind::Text),
		SortField::ascending("companyName", fields::COMPANY_NAME, ValueKind::Text),
	],
	search_fields: &[fields::JOB_TITLE, fields::COMPANY_NAME, fields::COVER_LETTER],
	filters: &[
		FilterParam {
			param: "status",
			field: fields::STATUS,
			kind: FilterKind::Enum(APPLICATION_STATUSES),
		},
		FilterParam { param: "jobId", field: fields::JOB_ID, kind: FilterKind::Id },
	],
};

/// Jobs that are neither soft-deleted nor archived.
pub fn jobs_base() -> Predicate {
	Predicate::and([Predicate::is_null(fields::DELETED_AT), Predicate::is_null(fields::ARCHIVED_AT)])
}

pub fn archived_jobs_base() -> Predicate {
	Predicate::and([
		Predicate::is_null(fields::DELETED_AT),
		Predicate::negate(Predicate::is_null(fields::ARCHIVED_AT)),
	])
}

/// Live jobs that still accept applications.
pub fn feed_base() -> Predicate {
	Predicate::and([jobs_base(), Predicate::eq(fields::STATUS, JOB_STATUS_OPEN)])
}

pub fn applications_base(caller_id: &str) -> Predicate {
	Predicate::and([
		Predicate::is_null(fields::WITHDRAWN_AT),
		Predicate::eq(fields::APPLICANT_ID, caller_id),
	])
}

/// A single job that has not been soft-deleted, archived or not.
pub fn visible_job(job_id: uuid::Uuid) -> Predicate {
	Predicate::and([Predicate::is_null(fields::DELETED_AT), Predicate::eq(fields::ID, job_id)])
}
