//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to stand in for the job board and run the full
//! fetch, parse, enrich and persist cycle end-to-end.

use jobyaari_scraper::config::{
    CategoryConfig, Config, ExecutionMode, OutputConfig, ScraperConfig, SiteConfig,
    UserAgentConfig,
};
use jobyaari_scraper::crawler::run_pipeline;
use jobyaari_scraper::storage::{CsvStore, DatasetStore, SqliteStore};
use jobyaari_scraper::{JobListing, NOT_FOUND};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(
    base_url: &str,
    dir: &Path,
    categories: Vec<CategoryConfig>,
    mode: ExecutionMode,
) -> Config {
    Config {
        scraper: ScraperConfig {
            request_timeout_secs: 5,
            detail_delay_ms: 0,
            category_delay_ms: 0,
            mode,
            max_concurrent_details: 3,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        site: SiteConfig {
            category_base_url: format!("{}/category/", base_url),
            detail_url_prefix: format!("{}/jobdetails/", base_url),
        },
        output: OutputConfig {
            csv_path: dir.join("jobs.csv").to_string_lossy().into_owned(),
            database_path: None,
            summary_path: None,
        },
        categories,
    }
}

fn listing_container(org: Option<&str>, detail_url: Option<&str>) -> String {
    let comment = detail_url
        .map(|u| format!(r#"<!-- <a class="btn" href="{}">View</a> -->"#, u))
        .unwrap_or_default();
    let profession = org
        .map(|o| format!(r#"<span class="drop__profession">{}</span>"#, o))
        .unwrap_or_default();
    format!(
        r#"<div class="drop__container">{}<div class="drop__card">
            {}
            <span class="salary-price"><span>Salary</span><span>₹35,000</span></span>
            <span class="drop__exp"><span>Exp</span><span>2 Years</span></span>
            <div class="salary">B.Tech</div>
        </div></div>"#,
        comment, profession
    )
}

fn listing_page(containers: &[String]) -> String {
    format!("<html><body><main>{}</main></body></html>", containers.concat())
}

fn detail_page(age: &str, openings: &str) -> String {
    format!(
        r#"<html><body>
        <ul><li class="age-list"><div class="job-location">{}</div></li></ul>
        <div class="job-detail-detail"><ul class="list">
            <li><div class="text">Qualification</div><div class="details"><div>Any</div></div></li>
            <li><div class="text">Job Openings</div><div class="details"><div>Posts</div><div>{}</div></div></li>
        </ul></div>
        </body></html>"#,
        age, openings
    )
}

async fn mount(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Two categories: Engineering with three posts, Science with one
async fn mount_job_board(server: &MockServer) {
    let uri = server.uri();

    let engineering = listing_page(&[
        listing_container(Some("Acme Corp"), Some(&format!("{}/jobdetails/101", uri))),
        listing_container(Some("Beta Works"), None),
        listing_container(None, Some(&format!("{}/jobdetails/103", uri))),
    ]);
    mount(server, "/category/engineering", 200, engineering).await;
    mount(server, "/jobdetails/101", 200, detail_page("21-35 Years", "12")).await;
    mount(server, "/jobdetails/103", 200, detail_page("18-30 Years", "3")).await;

    let science = listing_page(&[listing_container(
        Some("Gamma Labs"),
        Some(&format!("{}/jobdetails/201", uri)),
    )]);
    mount(server, "/category/science", 200, science).await;
    mount(server, "/jobdetails/201", 200, detail_page("Max 40", "7")).await;
}

fn two_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("Engineering", "engineering"),
        CategoryConfig::new("Science", "science"),
    ]
}

fn load_csv(config: &Config) -> Vec<JobListing> {
    CsvStore::new(&config.output.csv_path)
        .load_latest()
        .expect("Failed to read dataset")
        .expect("Dataset should exist")
        .listings
}

#[tokio::test]
async fn test_full_run_writes_dataset() {
    let server = MockServer::start().await;
    mount_job_board(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        dir.path(),
        two_categories(),
        ExecutionMode::Sequential,
    );

    let report = run_pipeline(&config, None).await.expect("Run failed");

    assert_eq!(report.collected, 4);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.retained, 3);
    assert!(report.failed_categories.is_empty());
    assert_eq!(report.snapshots.len(), 1);

    let listings = load_csv(&config);
    assert_eq!(listings.len(), 3);

    let acme = &listings[0];
    assert_eq!(acme.category, "Engineering");
    assert_eq!(acme.organization_name, "Acme Corp");
    assert_eq!(acme.vacancies, "12");
    assert_eq!(acme.salary, "₹35,000");
    assert_eq!(acme.age_limit, "21-35 Years");
    assert_eq!(acme.experience, "2");
    assert_eq!(acme.qualification, "B.Tech");
    assert_eq!(acme.post_url, format!("{}/jobdetails/101", server.uri()));

    let gamma = &listings[2];
    assert_eq!(gamma.category, "Science");
    assert_eq!(gamma.organization_name, "Gamma Labs");
    assert_eq!(gamma.vacancies, "7");
    assert_eq!(gamma.age_limit, "Max 40");
}

#[tokio::test]
async fn test_no_post_url_means_no_detail_fields() {
    let server = MockServer::start().await;
    mount_job_board(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        dir.path(),
        two_categories(),
        ExecutionMode::Sequential,
    );

    run_pipeline(&config, None).await.expect("Run failed");

    let listings = load_csv(&config);
    let beta = listings
        .iter()
        .find(|l| l.organization_name == "Beta Works")
        .expect("Beta Works should be retained");
    assert_eq!(beta.post_url, NOT_FOUND);
    assert_eq!(beta.vacancies, NOT_FOUND);
    assert_eq!(beta.age_limit, NOT_FOUND);

    // Every listing without a post URL lacks both detail fields
    for listing in &listings {
        if listing.post_url == NOT_FOUND {
            assert_eq!(listing.vacancies, NOT_FOUND);
            assert_eq!(listing.age_limit, NOT_FOUND);
        }
    }
}

#[tokio::test]
async fn test_retained_listings_always_have_organization() {
    let server = MockServer::start().await;
    mount_job_board(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        dir.path(),
        two_categories(),
        ExecutionMode::Sequential,
    );

    run_pipeline(&config, None).await.expect("Run failed");

    let listings = load_csv(&config);
    assert!(listings.iter().all(|l| l.organization_name != NOT_FOUND));
    assert!(!listings
        .iter()
        .any(|l| l.post_url.ends_with("/jobdetails/103")));
}

#[tokio::test]
async fn test_failed_category_does_not_affect_others() {
    let server = MockServer::start().await;
    mount_job_board(&server).await;
    mount(&server, "/category/commerce", 503, String::new()).await;
    let dir = tempfile::tempdir().unwrap();

    let categories = vec![
        CategoryConfig::new("Engineering", "engineering"),
        CategoryConfig::new("Commerce", "commerce"),
        CategoryConfig::new("Science", "science"),
    ];
    let config = create_test_config(
        &server.uri(),
        dir.path(),
        categories,
        ExecutionMode::Sequential,
    );

    let report = run_pipeline(&config, None).await.expect("Run failed");

    assert_eq!(report.failed_categories.len(), 1);
    assert_eq!(report.failed_categories[0].category, "Commerce");
    assert_eq!(report.categories.len(), 2);

    let listings = load_csv(&config);
    assert_eq!(listings.len(), 3);
    assert!(listings.iter().all(|l| l.category != "Commerce"));
    assert_eq!(
        listings.iter().filter(|l| l.category == "Science").count(),
        1
    );
}

#[tokio::test]
async fn test_detail_failure_only_blanks_detail_fields() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let page = listing_page(&[
        listing_container(Some("Delta Bank"), Some(&format!("{}/jobdetails/301", uri))),
        listing_container(Some("Echo Finance"), Some(&format!("{}/jobdetails/302", uri))),
    ]);
    mount(&server, "/category/commerce", 200, page).await;
    mount(&server, "/jobdetails/301", 500, String::new()).await;
    mount(&server, "/jobdetails/302", 200, detail_page("25-40", "9")).await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(
        &uri,
        dir.path(),
        vec![CategoryConfig::new("Commerce", "commerce")],
        ExecutionMode::Sequential,
    );

    let report = run_pipeline(&config, None).await.expect("Run failed");
    assert_eq!(report.detail_failures(), 1);

    let listings = load_csv(&config);
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].organization_name, "Delta Bank");
    assert_eq!(listings[0].vacancies, NOT_FOUND);
    assert_eq!(listings[0].age_limit, NOT_FOUND);
    assert_eq!(listings[0].salary, "₹35,000");
    assert_eq!(listings[0].post_url, format!("{}/jobdetails/301", uri));
    assert_eq!(listings[1].vacancies, "9");
}

#[tokio::test]
async fn test_second_run_replaces_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    let first_server = MockServer::start().await;
    mount_job_board(&first_server).await;
    let config = create_test_config(
        &first_server.uri(),
        dir.path(),
        two_categories(),
        ExecutionMode::Sequential,
    );
    run_pipeline(&config, None).await.expect("First run failed");
    assert_eq!(load_csv(&config).len(), 3);

    let second_server = MockServer::start().await;
    let page = listing_page(&[listing_container(Some("Zeta Systems"), None)]);
    mount(&second_server, "/category/engineering", 200, page).await;
    mount(&second_server, "/category/science", 200, listing_page(&[])).await;
    let config = create_test_config(
        &second_server.uri(),
        dir.path(),
        two_categories(),
        ExecutionMode::Sequential,
    );
    run_pipeline(&config, None).await.expect("Second run failed");

    let listings = load_csv(&config);
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].organization_name, "Zeta Systems");
}

#[tokio::test]
async fn test_empty_run_still_writes_header() {
    let server = MockServer::start().await;
    mount(&server, "/category/engineering", 404, String::new()).await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        dir.path(),
        vec![CategoryConfig::new("Engineering", "engineering")],
        ExecutionMode::Sequential,
    );

    let report = run_pipeline(&config, None).await.expect("Run failed");

    assert_eq!(report.retained, 0);
    assert_eq!(report.failed_categories.len(), 1);
    let text = std::fs::read_to_string(&config.output.csv_path).unwrap();
    assert_eq!(
        text.trim_end(),
        "Category,Organization Name,Vacancies,Salary,Age Limit,Experience,Qualification,Post URL"
    );
}

#[tokio::test]
async fn test_parallel_mode_matches_sequential() {
    let server = MockServer::start().await;
    mount_job_board(&server).await;

    let seq_dir = tempfile::tempdir().unwrap();
    let sequential = create_test_config(
        &server.uri(),
        seq_dir.path(),
        two_categories(),
        ExecutionMode::Sequential,
    );
    run_pipeline(&sequential, None).await.expect("Sequential run failed");

    let par_dir = tempfile::tempdir().unwrap();
    let parallel = create_test_config(
        &server.uri(),
        par_dir.path(),
        two_categories(),
        ExecutionMode::Parallel,
    );
    run_pipeline(&parallel, None).await.expect("Parallel run failed");

    assert_eq!(load_csv(&sequential), load_csv(&parallel));
}

#[tokio::test]
async fn test_sqlite_history_and_summary() {
    let server = MockServer::start().await;
    mount_job_board(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("jobs.db");
    let summary_path = dir.path().join("summary.md");

    let mut config = create_test_config(
        &server.uri(),
        dir.path(),
        two_categories(),
        ExecutionMode::Sequential,
    );
    config.output.database_path = Some(db_path.to_string_lossy().into_owned());
    config.output.summary_path = Some(summary_path.to_string_lossy().into_owned());

    let report = run_pipeline(&config, Some("deadbeef"))
        .await
        .expect("Run failed");
    assert_eq!(report.snapshots.len(), 2);
    assert_eq!(report.config_hash.as_deref(), Some("deadbeef"));

    let db = SqliteStore::new(&db_path).unwrap();
    let snapshot = db.load_latest().unwrap().expect("Snapshot should exist");
    assert_eq!(snapshot.listings, load_csv(&config));

    let history = db.list_snapshots().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].record_count, 3);
    assert_eq!(history[0].config_hash.as_deref(), Some("deadbeef"));

    let summary = std::fs::read_to_string(&summary_path).unwrap();
    assert!(summary.contains("- **Retained**: 3"));
    assert!(summary.contains("| Science |"));
}

#[tokio::test]
async fn test_unwritable_summary_keeps_dataset_and_report() {
    let server = MockServer::start().await;
    mount_job_board(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = create_test_config(
        &server.uri(),
        dir.path(),
        two_categories(),
        ExecutionMode::Sequential,
    );
    // A directory cannot be opened as the summary file
    config.output.summary_path = Some(dir.path().to_string_lossy().into_owned());

    let report = run_pipeline(&config, None)
        .await
        .expect("Summary failure must not fail the run");

    assert_eq!(report.retained, 3);
    assert_eq!(report.snapshots.len(), 1);
    assert!(report.summary_error.is_some());
    assert_eq!(load_csv(&config).len(), 3);
}

/// Paced run over the two-category board: three detail pages, one category pause
async fn timed_run(mode: ExecutionMode) -> std::time::Duration {
    let server = MockServer::start().await;
    mount_job_board(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = create_test_config(&server.uri(), dir.path(), two_categories(), mode);
    config.scraper.detail_delay_ms = 200;
    config.scraper.category_delay_ms = 300;

    let started = std::time::Instant::now();
    let report = run_pipeline(&config, None).await.expect("Run failed");
    let elapsed = started.elapsed();

    assert_eq!(report.retained, 3);
    elapsed
}

#[tokio::test]
async fn test_sequential_run_honors_detail_and_category_delays() {
    let elapsed = timed_run(ExecutionMode::Sequential).await;

    // 3 detail pauses of 200ms plus 1 category pause of 300ms
    assert!(
        elapsed >= std::time::Duration::from_millis(3 * 200 + 300),
        "{:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_parallel_run_stays_rate_limited() {
    let elapsed = timed_run(ExecutionMode::Parallel).await;

    // Engineering's two detail fetches are one period apart, then the category pause
    assert!(
        elapsed >= std::time::Duration::from_millis(200 + 300),
        "{:?}",
        elapsed
    );
}
