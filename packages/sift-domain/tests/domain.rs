use std::collections::BTreeSet;

use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

use sift_domain::{
	CallerContext, CandidateBuilder, CursorCodec, FilterBuilder, Keyset, ListParams, ListRecord,
	Order, PagingLimits, PagingMode, Predicate, SkillCatalog, SortDirection, Value, views,
	views::fields,
};

#[derive(Clone, Debug)]
struct Job {
	id: Uuid,
	title: &'static str,
	category_id: Uuid,
	skill_ids: Vec<Uuid>,
	created_at: OffsetDateTime,
}
impl ListRecord for Job {
	fn record_id(&self) -> Uuid {
		self.id
	}

	fn value(&self, field: &str) -> Value {
		match field {
			fields::ID => Value::Id(self.id),
			fields::TITLE => Value::from(self.title),
			fields::STATUS => Value::from(views::JOB_STATUS_OPEN),
			fields::CATEGORY_ID => Value::Id(self.category_id),
			fields::SKILL_IDS => Value::IdSet(self.skill_ids.clone()),
			fields::CREATED_AT => Value::Time(self.created_at),
			_ => Value::Null,
		}
	}
}

fn jobs_with_shared_timestamps() -> Vec<Job> {
	let base = datetime!(2025-01-01 00:00 UTC);

	(0..7_u128)
		.map(|n| Job {
			id: Uuid::from_u128(100 + n),
			title: "Engineer",
			category_id: Uuid::from_u128(1),
			skill_ids: Vec::new(),
			// Pairs of jobs share a timestamp.
			created_at: base + Duration::minutes((n / 2) as i64),
		})
		.collect()
}

fn page_after<'a>(
	jobs: &'a [Job],
	order: Order,
	after: Option<&Keyset>,
	limit: usize,
) -> Vec<&'a Job> {
	let mut sorted =
		jobs.iter().filter(|job| after.is_none_or(|k| k.admits(*job))).collect::<Vec<_>>();

	sorted.sort_by(|a, b| order.compare(*a, *b));
	sorted.truncate(limit);

	sorted
}

#[test]
fn keyset_walk_covers_every_record_once_despite_timestamp_ties() {
	let jobs = jobs_with_shared_timestamps();
	let sort = views::JOBS.default_sort();
	let codec = CursorCodec::new(&views::JOBS, sort, 1_024);
	let order = Order::from_sort(&sort);
	let mut seen = Vec::new();
	let mut after = None;

	loop {
		let page = page_after(&jobs, order, after.as_ref(), 3);

		if page.is_empty() {
			break;
		}

		seen.extend(page.iter().map(|job| job.id));

		let Some(last) = page.last() else { break };
		let token = codec.encode_record(*last).expect("encode failed");
		let cursor = codec.decode(&token).expect("cursor issued by this codec decodes");

		after = Some(Keyset::after(order, cursor));
	}

	let unique = seen.iter().copied().collect::<BTreeSet<_>>();

	assert_eq!(seen.len(), jobs.len());
	assert_eq!(unique.len(), jobs.len());
	assert_eq!(sort.direction, SortDirection::Desc);
}

#[test]
fn params_drive_sort_selection_and_filters() {
	let limits = PagingLimits::default();
	let params = ListParams::from_query(
		[("sortBy", "title"), ("sortDir", "DESC"), ("status", "paused"), ("q", "rust")],
		&limits,
	);
	let sort = views::JOBS.select(params.sort_by.as_deref(), params.sort_dir.as_deref());

	assert_eq!(sort.mode, PagingMode::Offset);
	assert_eq!(sort.direction, SortDirection::Desc);

	let predicate = FilterBuilder::new(&views::JOBS).build(
		views::jobs_base(),
		&params.filters,
		params.search.as_deref(),
	);

	assert!(predicate.fields().contains(&fields::STATUS));
	assert!(predicate.fields().contains(&fields::DESCRIPTION));
}

#[test]
fn candidate_filter_narrows_and_excludes() {
	let rust = Uuid::from_u128(11);
	let backend = Uuid::from_u128(21);
	let catalog = SkillCatalog::from_iter([(rust, backend)]);
	let ctx = CallerContext {
		caller_id: Some("u1".to_string()),
		skill_ids: BTreeSet::from([rust]),
		excluded_record_ids: BTreeSet::from([Uuid::from_u128(3)]),
		..CallerContext::default()
	};
	let candidates = CandidateBuilder::new(&catalog).build(&ctx);
	let predicate = candidates.apply(Predicate::always());
	let job = |id: u128, category: u128, skills: Vec<Uuid>| Job {
		id: Uuid::from_u128(id),
		title: "Engineer",
		category_id: Uuid::from_u128(category),
		skill_ids: skills,
		created_at: datetime!(2025-01-01 00:00 UTC),
	};

	assert!(predicate.matches(&job(1, 99, vec![rust])));
	assert!(predicate.matches(&job(2, 21, Vec::new())));
	assert!(!predicate.matches(&job(3, 21, vec![rust])));
	assert!(!predicate.matches(&job(4, 99, Vec::new())));

	let fallback = candidates.without_include().apply(Predicate::always());

	assert!(fallback.matches(&job(4, 99, Vec::new())));
	assert!(!fallback.matches(&job(3, 21, vec![rust])));
}
