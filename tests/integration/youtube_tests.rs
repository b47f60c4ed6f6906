//! Integration tests for the YouTube client and the comment pipeline

use serde_json::json;
use social_archiver::config::{LlmConfig, YouTubeConfig};
use social_archiver::sources::{build_http_client, user_agent, OllamaClient};
use social_archiver::youtube::{
    collect_comments, export_comment_archive, find_videos, VideoQuery, VideoSource, YouTubeClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn youtube(mock_server: &MockServer) -> YouTubeClient {
    YouTubeClient::new(
        build_http_client(&user_agent("")).unwrap(),
        &YouTubeConfig {
            api_url: mock_server.uri(),
            api_key: "test-key".to_string(),
        },
    )
}

async fn mount_search(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .and(query_param("part", "id,snippet"))
        .and(query_param("maxResults", "3"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": { "kind": "youtube#video", "videoId": "v1" },
                  "snippet": { "title": "Learning Rust", "description": "d",
                               "channelTitle": "c", "publishedAt": "2024-01-01T00:00:00Z" } },
                { "id": { "kind": "youtube#channel", "channelId": "ch" },
                  "snippet": { "title": "A channel" } },
                { "id": { "kind": "youtube#video", "videoId": "v1" },
                  "snippet": { "title": "Learning Rust", "description": "d",
                               "channelTitle": "c", "publishedAt": "2024-01-01T00:00:00Z" } }
            ]
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_search_keeps_only_videos() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server).await;

    let videos = youtube(&mock_server).search_videos("rust", 3).await.unwrap();

    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].video_id, "v1");
    assert_eq!(videos[0].channel_title, "c");
    assert_eq!(videos[0].url(), "https://www.youtube.com/watch?v=v1");
}

#[tokio::test]
async fn test_video_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "v1"))
        .and(query_param("part", "snippet,statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "snippet": { "title": "Learning Rust", "description": "about rust",
                             "publishedAt": "2024-01-01T00:00:00Z" },
                "statistics": { "viewCount": "1234", "likeCount": "5" }
            }]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&mock_server)
        .await;

    let client = youtube(&mock_server);

    let details = client.video_details("v1").await.unwrap();
    assert_eq!(details.title, "Learning Rust");
    assert_eq!(details.view_count, Some(1234));
    assert_eq!(details.url, "https://www.youtube.com/watch?v=v1");

    assert!(client.video_details("missing").await.unwrap_err().is_not_found());
}

async fn mount_comment_pages(mock_server: &MockServer) {
    let thread = |text: &str| {
        json!({ "snippet": { "topLevelComment": { "snippet": { "textDisplay": text } } } })
    };

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "v1"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [thread("third")]
        })))
        .mount(mock_server)
        .await;

    // first page only; the follow-up request carries a page token
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "v1"))
        .and(query_param("maxResults", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [thread("first"), thread("second")],
            "nextPageToken": "page-2"
        })))
        .up_to_n_times(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_comment_threads_follow_pages() {
    let mock_server = MockServer::start().await;
    mount_comment_pages(&mock_server).await;

    let comments = youtube(&mock_server).comment_threads("v1").await.unwrap();

    assert_eq!(comments, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_comment_pipeline_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_search(&mock_server).await;
    mount_comment_pages(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "people like it"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let videos = youtube(&mock_server);
    let llm = OllamaClient::new(
        build_http_client(&user_agent("")).unwrap(),
        &LlmConfig {
            base_url: mock_server.uri(),
            ..LlmConfig::default()
        },
    );
    let query = VideoQuery {
        keyword: "rust".to_string(),
        max_videos: 3,
        dedupe: true,
    };

    let hits = find_videos(&videos, &query).await.unwrap();
    assert_eq!(hits.len(), 1);

    let rows = collect_comments(&videos, &llm, &hits).await;
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.summary == "people like it"));
    assert_eq!(rows[2].comment, "third");

    let dir = tempfile::tempdir().unwrap();
    let workbook = dir.path().join("Comment Archive.xlsx");
    export_comment_archive(&workbook, &rows).unwrap();
    assert!(workbook.is_file());
}
