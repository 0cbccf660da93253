use uuid::Uuid;

use sift_domain::{
	CandidateBuilder, ListParams, ListResponse, Predicate, merge, views, views::fields,
};

use crate::{Error, JobItem, RelatedJobs, Result, SiftService, engine};

impl SiftService {
	/// Live jobs: not deleted, not archived.
	pub async fn list_jobs(&self, params: &ListParams) -> Result<ListResponse<JobItem>> {
		let predicate = Self::filtered(&views::JOBS, views::jobs_base(), params);

		self.run_list(self.stores.jobs.as_ref(), &views::JOBS, predicate, params).await
	}

	pub async fn list_archived_jobs(&self, params: &ListParams) -> Result<ListResponse<JobItem>> {
		let predicate = Self::filtered(&views::ARCHIVED_JOBS, views::archived_jobs_base(), params);

		self.run_list(self.stores.jobs.as_ref(), &views::ARCHIVED_JOBS, predicate, params).await
	}

	/// Open jobs narrowed to the caller's skills and categories, minus jobs they applied to.
	///
	/// Anonymous callers get the plain feed. When the narrowing leaves nothing and fallback is
	/// enabled, the narrowing is dropped but the exclusion is kept.
	pub async fn job_feed(
		&self,
		caller_id: Option<&str>,
		params: &ListParams,
	) -> Result<ListResponse<JobItem>> {
		let base = Self::filtered(&views::FEED, views::feed_base(), params);
		let caller_id = caller_id.map(str::trim).filter(|caller_id| !caller_id.is_empty());
		let predicate = match caller_id {
			Some(caller_id) => self.feed_predicate(caller_id, base).await?,
			None => base,
		};

		self.run_list(self.stores.jobs.as_ref(), &views::FEED, predicate, params).await
	}

	/// The job itself first, then up to `related_limit` recent jobs of its category.
	pub async fn related_jobs(&self, job_id: Uuid) -> Result<RelatedJobs> {
		let sort = views::JOBS.default_sort();
		let pinned = engine::first_rows(
			self.stores.jobs.as_ref(),
			views::visible_job(job_id),
			&sort,
			1,
		)
		.await?
		.into_iter()
		.next()
		.ok_or_else(|| Error::NotFound { message: format!("Job {job_id} does not exist.") })?;
		let related = match pinned.category_id {
			Some(category_id) =>
				engine::first_rows(
					self.stores.jobs.as_ref(),
					Predicate::and([
						views::jobs_base(),
						Predicate::eq(fields::CATEGORY_ID, category_id),
					]),
					&sort,
					self.cfg.paging.related_limit,
				)
				.await?,
			None => Vec::new(),
		};

		Ok(RelatedJobs { data: merge(Some(pinned), related) })
	}

	async fn feed_predicate(&self, caller_id: &str, base: Predicate) -> Result<Predicate> {
		let profile = self.stores.profiles.load_caller(caller_id).await?;
		let candidates = CandidateBuilder::new(&profile.catalog).build(&profile.context);
		let narrowed = candidates.apply(base.clone());

		if !candidates.is_narrowing() || !self.cfg.recommendation.fallback_on_empty {
			return Ok(narrowed);
		}

		let probe = engine::first_rows(
			self.stores.jobs.as_ref(),
			narrowed.clone(),
			&views::FEED.default_sort(),
			1,
		)
		.await?;

		if !probe.is_empty() {
			return Ok(narrowed);
		}

		tracing::debug!(
			caller_id,
			"No feed candidates match the caller's skills or categories; using the base feed."
		);

		Ok(candidates.without_include().apply(base))
	}
}
