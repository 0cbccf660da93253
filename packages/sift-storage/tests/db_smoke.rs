use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

use sift_config::Postgres;
use sift_domain::{
	FetchQuery, Keyset, Order, PageCursor, Predicate, Value, Window, views, views::fields,
};
use sift_storage::{
	db::Db,
	models::{ApplicationRow, JobRow},
	queries,
};
use sift_testkit::TestDatabase;

fn job(n: u128, category_id: Uuid, created_at: OffsetDateTime) -> JobRow {
	JobRow {
		job_id: Uuid::from_u128(n),
		title: format!("Job {n}"),
		description: "Build 100% reliable_systems".to_string(),
		company_name: "Acme".to_string(),
		location: "Remote".to_string(),
		category_id: Some(category_id),
		status: "OPEN".to_string(),
		salary: Some(1_000 * n as i64),
		created_at,
		archived_at: None,
		deleted_at: None,
		skill_ids: Vec::new(),
		application_count: 0,
	}
}

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SIFT_PG_DSN to run."]
async fn db_connects_and_bootstraps_twice() {
	let Some(base_dsn) = sift_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps_twice; set SIFT_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	db.ensure_schema().await.expect("Schema bootstrap must be idempotent.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'applications'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SIFT_PG_DSN to run."]
async fn keyset_pages_follow_composite_order() {
	let Some(base_dsn) = sift_testkit::env_dsn() else {
		eprintln!("Skipping keyset_pages_follow_composite_order; set SIFT_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let category = Uuid::from_u128(900);
	let shared = datetime!(2025-02-01 12:00 UTC);

	queries::insert_category(&db, category, "Engineering").await.expect("Failed to insert.");

	for n in 1..=5 {
		// Jobs 1 and 2 share a timestamp.
		let created_at = shared + Duration::minutes(n.max(2) as i64);

		queries::insert_job(&db, &job(n, category, created_at)).await.expect("Failed to insert.");
	}

	let order = Order::from_sort(&views::JOBS.default_sort());
	let first = queries::fetch_jobs(
		&db,
		&FetchQuery { predicate: views::jobs_base(), order, after: None, window: Window::Limit(3) },
	)
	.await
	.expect("Failed to fetch.");
	let ids = first.iter().map(|row| row.job_id.as_u128()).collect::<Vec<_>>();

	assert_eq!(ids, vec![5, 4, 3]);

	let last = first.last().expect("Page must not be empty.");
	let after = Keyset::after(
		order,
		PageCursor { sort_value: Value::Time(last.created_at), tie_break_id: last.job_id },
	);
	let second = queries::fetch_jobs(
		&db,
		&FetchQuery {
			predicate: views::jobs_base(),
			order,
			after: Some(after),
			window: Window::Limit(3),
		},
	)
	.await
	.expect("Failed to fetch.");
	let ids = second.iter().map(|row| row.job_id.as_u128()).collect::<Vec<_>>();

	assert_eq!(ids, vec![2, 1]);

	let searched = Predicate::and([
		views::jobs_base(),
		Predicate::contains(fields::DESCRIPTION, "100% RELIABLE_"),
	]);

	assert_eq!(queries::count_jobs(&db, &searched).await.expect("Failed to count."), 5);

	let literal = Predicate::contains(fields::DESCRIPTION, "100%_");

	assert_eq!(queries::count_jobs(&db, &literal).await.expect("Failed to count."), 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SIFT_PG_DSN to run."]
async fn caller_profile_counts_withdrawn_applications_as_acted_on() {
	let Some(base_dsn) = sift_testkit::env_dsn() else {
		eprintln!("Skipping caller_profile_counts_withdrawn_applications_as_acted_on; set SIFT_PG_DSN.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let backend = Uuid::from_u128(901);
	let data = Uuid::from_u128(902);
	let rust = Uuid::from_u128(951);
	let now = datetime!(2025-03-01 00:00 UTC);

	queries::insert_category(&db, backend, "Backend").await.expect("Failed to insert.");
	queries::insert_category(&db, data, "Data").await.expect("Failed to insert.");
	queries::insert_skill(&db, rust, "Rust", Some(backend)).await.expect("Failed to insert.");
	queries::insert_user_skill(&db, "u1", rust).await.expect("Failed to insert.");

	let mut tagged = job(1, backend, now);

	tagged.skill_ids = vec![rust];

	queries::insert_job(&db, &tagged).await.expect("Failed to insert.");
	queries::insert_job(&db, &job(2, data, now)).await.expect("Failed to insert.");
	queries::insert_application(
		&db,
		&ApplicationRow {
			application_id: Uuid::from_u128(7_001),
			job_id: Uuid::from_u128(2),
			applicant_id: "u1".to_string(),
			status: "PENDING".to_string(),
			cover_letter: String::new(),
			created_at: now,
			withdrawn_at: Some(now + Duration::hours(1)),
			job_title: String::new(),
			company_name: String::new(),
		},
	)
	.await
	.expect("Failed to insert.");

	let profile = queries::load_caller_profile(&db, "u1").await.expect("Failed to load profile.");

	assert_eq!(profile.context.caller_id.as_deref(), Some("u1"));
	assert!(profile.context.skill_ids.contains(&rust));
	assert!(profile.context.applied_category_ids.contains(&data));
	assert!(profile.context.excluded_record_ids.contains(&Uuid::from_u128(2)));
	assert!(profile.catalog.categories_implied_by(&profile.context.skill_ids).contains(&backend));

	let rows = queries::fetch_jobs(
		&db,
		&FetchQuery {
			predicate: Predicate::is_in(fields::SKILL_IDS, [rust]),
			order: Order::from_sort(&views::JOBS.default_sort()),
			after: None,
			window: Window::Limit(10),
		},
	)
	.await
	.expect("Failed to fetch.");

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].skill_ids, vec![rust]);
	assert_eq!(rows[0].application_count, 0);

	let applications = queries::count_applications(&db, &views::applications_base("u1"))
		.await
		.expect("Failed to count.");

	assert_eq!(applications, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
