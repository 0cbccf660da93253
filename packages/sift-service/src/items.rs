//! Records served by the list views.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use sift_domain::{ListRecord, Value, views::fields};
use sift_storage::models::{ApplicationRow, JobRow};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobItem {
	pub id: Uuid,
	pub title: String,
	pub description: String,
	pub company_name: String,
	pub location: String,
	pub category_id: Option<Uuid>,
	pub status: String,
	pub salary: Option<i64>,
	#[serde(with = "sift_domain::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(default, with = "sift_domain::time_serde::option")]
	pub archived_at: Option<OffsetDateTime>,
	#[serde(skip)]
	pub deleted_at: Option<OffsetDateTime>,
	pub skill_ids: Vec<Uuid>,
	pub application_count: i64,
}
impl ListRecord for JobItem {
	fn record_id(&self) -> Uuid {
		self.id
	}

	fn value(&self, field: &str) -> Value {
		match field {
			fields::ID => Value::Id(self.id),
			fields::TITLE => Value::from(self.title.as_str()),
			fields::DESCRIPTION => Value::from(self.description.as_str()),
			fields::COMPANY_NAME => Value::from(self.company_name.as_str()),
			fields::LOCATION => Value::from(self.location.as_str()),
			fields::CATEGORY_ID => Value::from(self.category_id),
			fields::STATUS => Value::from(self.status.as_str()),
			fields::SALARY => Value::from(self.salary),
			fields::CREATED_AT => Value::Time(self.created_at),
			fields::ARCHIVED_AT => Value::from(self.archived_at),
			fields::DELETED_AT => Value::from(self.deleted_at),
			fields::SKILL_IDS => Value::IdSet(self.skill_ids.clone()),
			fields::APPLICATION_COUNT => Value::Int(self.application_count),
			_ => Value::Null,
		}
	}
}
impl From<JobRow> for JobItem {
	fn from(row: JobRow) -> Self {
		Self {
			id: row.job_id,
			title: row.title,
			description: row.description,
			company_name: row.company_name,
			location: row.location,
			category_id: row.category_id,
			status: row.status,
			salary: row.salary,
			created_at: row.created_at,
			archived_at: row.archived_at,
			deleted_at: row.deleted_at,
			skill_ids: row.skill_ids,
			application_count: row.application_count,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationItem {
	pub id: Uuid,
	pub job_id: Uuid,
	pub applicant_id: String,
	pub status: String,
	pub cover_letter: String,
	#[serde(with = "sift_domain::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(skip)]
	pub withdrawn_at: Option<OffsetDateTime>,
	pub job_title: String,
	pub company_name: String,
}
impl ListRecord for ApplicationItem {
	fn record_id(&self) -> Uuid {
		self.id
	}

	fn value(&self, field: &str) -> Value {
		match field {
			fields::ID => Value::Id(self.id),
			fields::JOB_ID => Value::Id(self.job_id),
			fields::APPLICANT_ID => Value::from(self.applicant_id.as_str()),
			fields::STATUS => Value::from(self.status.as_str()),
			fields::COVER_LETTER => Value::from(self.cover_letter.as_str()),
			fields::CREATED_AT => Value::Time(self.created_at),
			fields::WITHDRAWN_AT => Value::from(self.withdrawn_at),
			fields::JOB_TITLE => Value::from(self.job_title.as_str()),
			fields::COMPANY_NAME => Value::from(self.company_name.as_str()),
			_ => Value::Null,
		}
	}
}
impl From<ApplicationRow> for ApplicationItem {
	fn from(row: ApplicationRow) -> Self {
		Self {
			id: row.application_id,
			job_id: row.job_id,
			applicant_id: row.applicant_id,
			status: row.status,
			cover_letter: row.cover_letter,
			created_at: row.created_at,
			withdrawn_at: row.withdrawn_at,
			job_title: row.job_title,
			company_name: row.company_name,
		}
	}
}

/// A pinned job followed by other jobs of its category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedJobs {
	pub data: Vec<JobItem>,
}
