use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wayback_engine::{
    list_snapshot_pages, parse_timemap, FetchSettings, ProxyClientFetcher, RetryPolicy,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn parse_timemap_returns_the_distinct_page_urls() {
    let body = br#"[
        ["original", "mimetype", "original"],
        ["20200101", "text/html", "http://x.com/a"],
        ["20200102", "text/html", "http://x.com/b"],
        ["20200103", "text/html", "http://x.com/a"]
    ]"#;
    let pages = parse_timemap(body);
    assert_eq!(pages, vec!["http://x.com/a".to_string(), "http://x.com/b".to_string()]);
}

#[test]
fn parse_timemap_discards_rows_without_an_absolute_url() {
    let body = br#"[
        ["20200101", "text/html", "/relative/path"],
        ["20200102", "text/html", "x.com/no-scheme"],
        ["20200103", "text/html", 42],
        ["20200104", "text/html", "https://x.com/ok"],
        ["short-row"]
    ]"#;
    assert_eq!(parse_timemap(body), vec!["https://x.com/ok".to_string()]);
}

#[test]
fn parse_timemap_treats_malformed_json_as_zero_results() {
    assert!(parse_timemap(b"<html>borked gateway</html>").is_empty());
    assert!(parse_timemap(br#"{"not": "an array"}"#).is_empty());
}

#[tokio::test]
async fn list_snapshot_pages_queries_the_timemap_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/web/timemap/json"))
        .and(query_param("url", "x.com/someone"))
        .and(query_param("matchType", "prefix"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[["k","t","original"],["20200101","text/html","http://x.com/a"]]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let fetcher = ProxyClientFetcher::new(
        FetchSettings::default(),
        RetryPolicy {
            max_attempts: 2,
            delay: Duration::ZERO,
        },
        None,
        CancellationToken::new(),
    );
    let timemap_url = format!(
        "{}/web/timemap/json?url=x.com/someone&matchType=prefix",
        server.uri()
    );

    let pages = list_snapshot_pages(&fetcher, &timemap_url).await.unwrap();
    assert_eq!(pages, vec!["http://x.com/a".to_string()]);
}

#[tokio::test]
async fn list_snapshot_pages_yields_zero_for_a_missing_timemap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/web/timemap/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ProxyClientFetcher::new(
        FetchSettings::default(),
        RetryPolicy {
            max_attempts: 2,
            delay: Duration::ZERO,
        },
        None,
        CancellationToken::new(),
    );
    let timemap_url = format!("{}/web/timemap/json?url=x.com/ghost", server.uri());

    let pages = list_snapshot_pages(&fetcher, &timemap_url).await.unwrap();
    assert!(pages.is_empty());
}
