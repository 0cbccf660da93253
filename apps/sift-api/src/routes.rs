use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;
use uuid::Uuid;

use crate::state::AppState;
use sift_domain::{ListParams, ListResponse};
use sift_service::{ApplicationItem, Error as ServiceError, JobItem, RelatedJobs};

/// Caller identity, resolved by the upstream gateway. Absent or blank means anonymous.
pub const HEADER_CALLER_ID: &str = "X-Sift-Caller-Id";

type QueryPairs = Query<Vec<(String, String)>>;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/jobs", get(list_jobs))
		.route("/v1/jobs/archived", get(list_archived_jobs))
		.route("/v1/jobs/feed", get(job_feed))
		.route("/v1/jobs/{job_id}/related", get(related_jobs))
		.route("/v1/applications", get(list_applications))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_jobs(
	State(state): State<AppState>,
	Query(pairs): QueryPairs,
) -> Result<Json<ListResponse<JobItem>>, ApiError> {
	let params = list_params(&state, pairs);
	let response = state.service.list_jobs(&params).await?;

	Ok(Json(response))
}

async fn list_archived_jobs(
	State(state): State<AppState>,
	Query(pairs): QueryPairs,
) -> Result<Json<ListResponse<JobItem>>, ApiError> {
	let params = list_params(&state, pairs);
	let response = state.service.list_archived_jobs(&params).await?;

	Ok(Json(response))
}

async fn job_feed(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(pairs): QueryPairs,
) -> Result<Json<ListResponse<JobItem>>, ApiError> {
	let params = list_params(&state, pairs);
	let response = state.service.job_feed(read_caller_id(&headers), &params).await?;

	Ok(Json(response))
}

async fn list_applications(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(pairs): QueryPairs,
) -> Result<Json<ListResponse<ApplicationItem>>, ApiError> {
	let params = list_params(&state, pairs);
	let response = state.service.list_applications(read_caller_id(&headers), &params).await?;

	Ok(Json(response))
}

async fn related_jobs(
	State(state): State<AppState>,
	Path(job_id): Path<String>,
) -> Result<Json<RelatedJobs>, ApiError> {
	let job_id = Uuid::parse_str(job_id.trim()).map_err(|_| {
		json_error(
			StatusCode::BAD_REQUEST,
			"INVALID_REQUEST",
			"job_id must be a UUID.",
			Some(vec!["$.path.job_id".to_string()]),
		)
	})?;
	let response = state.service.related_jobs(job_id).await?;

	Ok(Json(response))
}

fn list_params(state: &AppState, pairs: Vec<(String, String)>) -> ListParams {
	ListParams::from_query(pairs, &state.service.paging_limits())
}

fn read_caller_id(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(HEADER_CALLER_ID)?;
	let value = raw.to_str().ok()?.trim();

	if value.is_empty() { None } else { Some(value) }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			ServiceError::CallerRequired { message } => json_error(
				StatusCode::UNAUTHORIZED,
				"CALLER_REQUIRED",
				message,
				Some(vec![format!("$.headers.{HEADER_CALLER_ID}")]),
			),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			ServiceError::Storage { message } => {
				tracing::warn!(error = %message, "List request failed in storage.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Storage request failed.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
