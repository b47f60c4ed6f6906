//! Integration tests for the lap driver
//!
//! The first tests drive `LapDriver` with in-memory collaborators; the last
//! one runs `crawl` end-to-end against wiremock servers.

use async_trait::async_trait;
use serde_json::{json, Value};
use social_archiver::config::{RedditConfig, RunConfig, ServiceConfig};
use social_archiver::crawler::{crawl, LapDriver};
use social_archiver::sources::{
    Comment, CommentExpander, CommentForest, SourceError, SourceResult, Submission,
    SubmissionSearch,
};
use social_archiver::storage::params::{
    get_i64, read_params, TOTAL, TOTAL_SUBMISSIONS, UTC_NEWER, UTC_OLDER,
};
use social_archiver::storage::OutputManager;
use social_archiver::{ArchiveError, BoundWindow, LapPhase};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type Query = (Option<i64>, Option<i64>);

/// Serves pre-arranged pages in order and records every query
#[derive(Clone, Default)]
struct ScriptedSearch {
    pages: Arc<Mutex<VecDeque<SourceResult<Vec<Submission>>>>>,
    queries: Arc<Mutex<Vec<Query>>>,
}

impl ScriptedSearch {
    fn with_pages(pages: Vec<SourceResult<Vec<Submission>>>) -> Self {
        Self {
            pages: Arc::new(Mutex::new(pages.into())),
            queries: Arc::default(),
        }
    }

    fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionSearch for ScriptedSearch {
    async fn search(
        &self,
        after: Option<i64>,
        before: Option<i64>,
        _limit: usize,
    ) -> SourceResult<Vec<Submission>> {
        self.queries.lock().unwrap().push((after, before));
        self.pages.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }
}

/// One comment per submission; `gone` is deleted and `flaky` errors out
struct OneCommentEach;

#[async_trait]
impl CommentExpander for OneCommentEach {
    async fn expand_comments(&self, submission_id: &str, _cap: usize) -> SourceResult<CommentForest> {
        if submission_id == "gone" {
            return Err(SourceError::NotFound(submission_id.to_string()));
        }
        if submission_id == "flaky" {
            return Err(SourceError::Status {
                url: format!("http://reddit/comments/{}.json", submission_id),
                status: 500,
            });
        }
        let comment = Comment::from_payload(json!({
            "id": format!("c_{}", submission_id),
            "parent_id": format!("t3_{}", submission_id),
            "body": "first!\nsecond line",
            "created_utc": 1
        }))
        .unwrap();
        Ok(CommentForest {
            comments: vec![comment],
            collapsed: 0,
        })
    }
}

fn submission(id: &str, created_utc: i64) -> Submission {
    Submission::from_payload(json!({
        "id": id,
        "created_utc": created_utc,
        "title": format!("Title {}", id),
        "selftext": "body"
    }))
    .unwrap()
}

fn run_config(laps: u32, utc_after: Option<i64>, utc_before: Option<i64>) -> RunConfig {
    RunConfig {
        subreddit: "rust".to_string(),
        laps,
        batch_size: 5,
        utc_after,
        utc_before,
        ..RunConfig::default()
    }
}

fn driver(dir: &Path, config: RunConfig, search: &ScriptedSearch) -> LapDriver {
    let output = OutputManager::initialize_with_run_id(dir, "rust", "20240101000000").unwrap();
    LapDriver::new(
        config,
        Box::new(search.clone()),
        Box::new(OneCommentEach),
        output,
        None,
    )
    .unwrap()
}

#[tokio::test]
async fn test_not_found_submission_is_kept_without_comments() {
    let dir = tempfile::tempdir().unwrap();
    let search = ScriptedSearch::with_pages(vec![Ok(vec![
        submission("a", 10),
        submission("gone", 20),
    ])]);
    let mut driver = driver(dir.path(), run_config(1, Some(5), None), &search);

    let summary = driver.run().await.unwrap();

    assert_eq!(driver.phase(), LapPhase::Done);
    assert_eq!(summary.totals.submissions, 2);
    assert_eq!(summary.totals.comments, 1);

    let archive = driver.output().archive();
    assert!(archive.submissions.iter().any(|s| s.id == "gone"));
    assert!(archive.comments.iter().all(|c| c.submission_id == "a"));
    assert_eq!(archive.comments[0].body, "first!\\nsecond line");
}

#[tokio::test]
async fn test_comment_failure_does_not_stop_lap() {
    let dir = tempfile::tempdir().unwrap();
    let search = ScriptedSearch::with_pages(vec![Ok(vec![
        submission("a", 10),
        submission("flaky", 20),
        submission("b", 30),
    ])]);
    let mut driver = driver(dir.path(), run_config(1, Some(5), None), &search);

    let summary = driver.run().await.unwrap();

    assert_eq!(driver.phase(), LapPhase::Done);
    assert_eq!(summary.totals.submissions, 3);
    assert_eq!(summary.totals.comments, 2);
    assert_eq!(summary.window, BoundWindow::new(10, 30));

    let archive = driver.output().archive();
    assert!(archive.submissions.iter().any(|s| s.id == "flaky"));
    let commented: Vec<_> = archive
        .comments
        .iter()
        .map(|c| c.submission_id.as_str())
        .collect();
    assert_eq!(commented, vec!["a", "b"]);
}

#[tokio::test]
async fn test_empty_lap_keeps_window() {
    let dir = tempfile::tempdir().unwrap();
    let search = ScriptedSearch::with_pages(vec![
        Ok(vec![submission("a", 10), submission("b", 20)]),
        Ok(vec![]),
    ]);
    let mut driver = driver(dir.path(), run_config(2, Some(5), None), &search);

    let summary = driver.run().await.unwrap();

    assert_eq!(summary.laps.len(), 2);
    assert_eq!(summary.window, BoundWindow::new(10, 20));
    assert_eq!(summary.laps[1].window, BoundWindow::new(10, 20));
    assert_eq!(search.queries(), vec![(Some(5), None), (Some(20), None)]);

    let params = driver.output().load_params().unwrap();
    assert_eq!(get_i64(&params, UTC_OLDER), Some(10));
    assert_eq!(get_i64(&params, UTC_NEWER), Some(20));
    assert_eq!(get_i64(&params, TOTAL), Some(4));
}

#[tokio::test]
async fn test_before_direction_walks_lower_bound() {
    let dir = tempfile::tempdir().unwrap();
    let search = ScriptedSearch::with_pages(vec![
        Ok(vec![submission("a", 90), submission("b", 80)]),
        Ok(vec![submission("c", 70)]),
    ]);
    let mut driver = driver(dir.path(), run_config(2, None, Some(100)), &search);

    let summary = driver.run().await.unwrap();

    assert_eq!(search.queries(), vec![(None, Some(100)), (None, Some(80))]);
    // latest lap only
    assert_eq!(summary.window, BoundWindow::new(70, 70));
}

#[tokio::test]
async fn test_resumed_window_sets_first_frontier() {
    let dir = tempfile::tempdir().unwrap();
    let search = ScriptedSearch::with_pages(vec![]);
    let mut driver = driver(dir.path(), run_config(1, Some(0), None), &search)
        .with_window(BoundWindow::new(1, 50));

    assert_eq!(driver.frontier(), (Some(50), None));
    driver.run().await.unwrap();
    assert_eq!(search.queries(), vec![(Some(50), None)]);
}

#[tokio::test]
async fn test_search_failure_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let search = ScriptedSearch::with_pages(vec![
        Ok(vec![submission("a", 10)]),
        Err(SourceError::Status {
            url: "http://search".to_string(),
            status: 503,
        }),
    ]);
    let mut driver = driver(dir.path(), run_config(3, Some(5), None), &search);

    let result = driver.run().await;

    assert!(matches!(result, Err(ArchiveError::Source(_))));
    assert_eq!(driver.phase(), LapPhase::Failed);

    // the completed lap stays on disk
    let params = driver.output().load_params().unwrap();
    assert_eq!(get_i64(&params, TOTAL_SUBMISSIONS), Some(1));
    assert!(driver.output().layout().raw_submissions_file("1").is_file());
}

#[tokio::test]
async fn test_conflicting_bounds_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputManager::initialize_with_run_id(dir.path(), "rust", "r").unwrap();

    let result = LapDriver::new(
        run_config(1, Some(1), Some(2)),
        Box::new(ScriptedSearch::default()),
        Box::new(OneCommentEach),
        output,
        None,
    );

    assert!(matches!(result, Err(ArchiveError::Config(_))));
}

#[tokio::test]
async fn test_missing_resume_file_creates_no_run_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        subreddit: "rust".to_string(),
        output_dir: dir.path().to_string_lossy().to_string(),
        resume_from: Some(
            dir.path()
                .join("missing/params.yaml")
                .to_string_lossy()
                .to_string(),
        ),
        ..RunConfig::default()
    };

    let result = crawl(config, &ServiceConfig::default(), None).await;

    assert!(matches!(result, Err(ArchiveError::Storage(_))));
    assert!(!dir.path().join("rust").exists());
}

fn comment_page(submission_id: &str) -> Value {
    json!([
        { "kind": "Listing", "data": { "children": [
            { "kind": "t3", "data": { "id": submission_id } }
        ] } },
        { "kind": "Listing", "data": { "children": [
            { "kind": "t1", "data": {
                "id": format!("c_{}", submission_id),
                "parent_id": format!("t3_{}", submission_id),
                "body": "nice",
                "created_utc": 1000000600.0,
                "permalink": format!("/r/rust/comments/{}/x/c/", submission_id),
                "replies": ""
            } }
        ] } }
    ])
}

#[tokio::test]
async fn test_full_crawl_two_laps() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    let data: Vec<Value> = (1..=5)
        .map(|i| {
            json!({
                "id": format!("s{}", i),
                "created_utc": 1000000000 + i * 100,
                "title": format!("Title {}", i),
                "selftext": "line one\nline two",
                "full_link": format!("https://www.reddit.com/r/rust/comments/s{}/", i)
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/reddit/search/submission"))
        .and(query_param("subreddit", "rust"))
        .and(query_param("after", "1000000000"))
        .and(query_param("size", "5"))
        .and(query_param("sort", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reddit/search/submission"))
        .and(query_param("after", "1000000500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    for i in 1..=5 {
        let id = format!("s{}", i);
        let response = if i == 3 {
            ResponseTemplate::new(404)
        } else {
            ResponseTemplate::new(200).set_body_json(comment_page(&id))
        };
        Mock::given(method("GET"))
            .and(path(format!("/comments/{}.json", id)))
            .respond_with(response)
            .mount(&mock_server)
            .await;
    }

    let services = ServiceConfig {
        reddit: RedditConfig {
            search_url: base_url.clone(),
            api_url: base_url.clone(),
            ..RedditConfig::default()
        },
        ..ServiceConfig::default()
    };
    let config = RunConfig {
        subreddit: "rust".to_string(),
        output_dir: dir.path().to_string_lossy().to_string(),
        batch_size: 5,
        laps: 2,
        reddit_secret: "hunter2".to_string(),
        utc_after: Some(1000000000),
        ..RunConfig::default()
    };

    let summary = crawl(config, &services, Some("abc123".to_string()))
        .await
        .expect("crawl should succeed");

    assert_eq!(summary.window, BoundWindow::new(1000000100, 1000000500));
    assert_eq!(summary.totals.submissions, 5);
    assert_eq!(summary.totals.comments, 4);
    assert!(summary.workbook.is_file());

    let run_dir = dir.path().join("rust").join(&summary.run_id);
    let raw = std::fs::read_to_string(run_dir.join("submissions/raw/1.njson")).unwrap();
    assert_eq!(raw.lines().count(), 5);
    for line in raw.lines() {
        let record: Value = serde_json::from_str(line).unwrap();
        assert!(record.get("id").is_some());
    }
    assert!(!run_dir.join("submissions/raw/2.njson").exists());
    assert_eq!(
        std::fs::read_to_string(run_dir.join("comments/raw/1.njson"))
            .unwrap()
            .lines()
            .count(),
        4
    );
    assert!(run_dir.join("submissions/submissions.csv").is_file());
    assert!(run_dir.join("comments/comments.csv").is_file());

    let params_text = std::fs::read_to_string(run_dir.join("params.yaml")).unwrap();
    assert!(!params_text.contains("hunter2"));

    let params = read_params(&run_dir.join("params.yaml")).unwrap();
    assert_eq!(get_i64(&params, TOTAL_SUBMISSIONS), Some(5));
    assert_eq!(get_i64(&params, UTC_OLDER), Some(1000000100));
    assert_eq!(get_i64(&params, UTC_NEWER), Some(1000000500));
    assert_eq!(
        params.get("config_hash").and_then(serde_yaml::Value::as_str),
        Some("abc123")
    );
    assert_eq!(
        params.get("subreddit").and_then(serde_yaml::Value::as_str),
        Some("rust")
    );
}
