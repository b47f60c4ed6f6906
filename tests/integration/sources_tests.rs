//! Integration tests for the HTTP collaborators against wiremock servers

use serde_json::json;
use social_archiver::config::{LlmConfig, RedditConfig};
use social_archiver::sources::{
    build_http_client, user_agent, CommentExpander, OllamaClient, PushshiftClient, RedditClient,
    SourceError, SubmissionSearch, Summarizer,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    build_http_client(&user_agent("tester")).unwrap()
}

fn comment(id: &str, parent: &str) -> serde_json::Value {
    json!({
        "kind": "t1",
        "data": {
            "id": id,
            "parent_id": parent,
            "body": format!("body {}", id),
            "created_utc": 1700000000,
            "replies": ""
        }
    })
}

#[tokio::test]
async fn test_pushshift_before_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reddit/search/submission"))
        .and(query_param("subreddit", "rust"))
        .and(query_param("before", "1700000000"))
        .and(query_param("sort", "desc"))
        .and(query_param("sort_type", "created_utc"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "b", "created_utc": 1699999990, "title": "two" },
                { "id": "a", "created_utc": 1699999980.0, "title": "one",
                  "permalink": "/r/rust/comments/a/one/" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let search = PushshiftClient::new(client(), &mock_server.uri(), "rust");
    let submissions = search.search(None, Some(1700000000), 2).await.unwrap();

    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[1].created_utc, 1699999980);
    assert_eq!(
        submissions[1].permalink,
        "https://www.reddit.com/r/rust/comments/a/one/"
    );
}

#[tokio::test]
async fn test_pushshift_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let search = PushshiftClient::new(client(), &mock_server.uri(), "rust");
    let result = search.search(Some(1), None, 10).await;

    assert!(matches!(result, Err(SourceError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_reddit_missing_submission_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/comments/zzz.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let reddit = RedditClient::anonymous(client(), &mock_server.uri());
    let result = reddit.expand_comments("zzz", 10).await;

    assert!(result.unwrap_err().is_not_found());
}

async fn mount_thread_with_placeholder(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/comments/s1.json"))
        .and(query_param("raw_json", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "kind": "Listing", "data": { "children": [] } },
            { "kind": "Listing", "data": { "children": [
                comment("a", "t3_s1"),
                { "kind": "more", "data": { "children": ["b", "c"], "count": 2 } }
            ] } }
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/morechildren.json"))
        .and(query_param("link_id", "t3_s1"))
        .and(query_param("children", "b,c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "json": { "data": { "things": [
                comment("b", "t3_s1"),
                comment("c", "t1_b")
            ] } }
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_reddit_expands_placeholders() {
    let mock_server = MockServer::start().await;
    mount_thread_with_placeholder(&mock_server).await;

    let reddit = RedditClient::anonymous(client(), &mock_server.uri());
    let forest = reddit.expand_comments("s1", 100).await.unwrap();

    let ids: Vec<_> = forest.comments.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(forest.collapsed, 0);
    assert!(forest.comments[0].raw.get("replies").is_none());
}

#[tokio::test]
async fn test_reddit_cap_leaves_placeholders_collapsed() {
    let mock_server = MockServer::start().await;
    mount_thread_with_placeholder(&mock_server).await;

    let reddit = RedditClient::anonymous(client(), &mock_server.uri());
    let forest = reddit.expand_comments("s1", 0).await.unwrap();

    assert_eq!(forest.len(), 1);
    assert_eq!(forest.collapsed, 1);
}

#[tokio::test]
async fn test_reddit_app_token_is_used() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "token_type": "bearer",
            "expires_in": 86400
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments/s2.json"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "kind": "Listing", "data": { "children": [] } },
            { "kind": "Listing", "data": { "children": [comment("x", "t3_s2")] } }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = RedditConfig {
        oauth_url: base_url.clone(),
        token_url: format!("{}/api/v1/access_token", base_url),
        ..RedditConfig::default()
    };
    let reddit = RedditClient::authenticate(client(), &config, "id", "secret")
        .await
        .unwrap();
    let forest = reddit.expand_comments("s2", 10).await.unwrap();

    assert_eq!(forest.len(), 1);
}

#[tokio::test]
async fn test_ollama_generate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("\"stream\":false"))
        .and(body_string_contains("llava:34b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llava:34b",
            "response": "a short summary",
            "done": true
        })))
        .mount(&mock_server)
        .await;

    let llm = OllamaClient::new(
        client(),
        &LlmConfig {
            base_url: mock_server.uri(),
            ..LlmConfig::default()
        },
    );

    assert_eq!(llm.summarize("summarize this").await.unwrap(), "a short summary");
}

#[tokio::test]
async fn test_ollama_missing_response_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "no model" })))
        .mount(&mock_server)
        .await;

    let llm = OllamaClient::new(
        client(),
        &LlmConfig {
            base_url: mock_server.uri(),
            ..LlmConfig::default()
        },
    );

    assert!(matches!(
        llm.summarize("x").await,
        Err(SourceError::Decode(_))
    ));
}
