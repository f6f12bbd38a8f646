//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! probe / fetch / extract cycle through the real reqwest transport.

use std::collections::HashSet;
use sumi_crawl::config::{Config, CrawlerConfig, SeedConfig, UserAgentConfig};
use sumi_crawl::crawler::{build_scheduler, crawl};
use sumi_crawl::frontier::SelectionStrategy;
use sumi_crawl::CrawlState;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay and FIFO selection
fn create_test_config(seeds: Vec<String>) -> Config {
    Config {
        crawler: CrawlerConfig {
            politeness_interval: 0, // No pacing in tests
            selection_policy: SelectionStrategy::Fifo,
            request_timeout: 5,
            connect_timeout: 5,
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            identity: "TestBot/1.0".to_string(),
        },
        seeds: SeedConfig { urls: seeds },
    }
}

async fn mount_html(server: &MockServer, page: &str, body: String) {
    Mock::given(method("HEAD"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r##"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="page2">Page 2</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">Menu</a>
            </body></html>"##
            .to_string(),
    )
    .await;

    mount_html(
        &mock_server,
        "/page1",
        r#"<html><body>
            <a href="/">Home</a>
            <a href="/data.json">Data</a>
            </body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        &mock_server,
        "/page2",
        r#"<html><body>Content 2</body></html>"#.to_string(),
    )
    .await;

    // Probe says JSON, so the body must never be requested
    Mock::given(method("HEAD"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)]);
    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    let visited: HashSet<String> = report.visited.into_iter().collect();
    let expected: HashSet<String> = [
        format!("{}/", base_url),
        format!("{}/page1", base_url),
        format!("{}/page2", base_url),
    ]
    .into_iter()
    .collect();

    assert_eq!(visited, expected);
    assert_eq!(report.remaining, 0);
    assert!(!report.stopped);
    assert_eq!(report.stats.pages_skipped, 1);
    assert_eq!(
        report.stats.politeness_delays,
        report.stats.iterations * 2
    );
}

#[tokio::test]
async fn test_unreachable_probe_never_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/missing", base_url)]);
    let mut scheduler = build_scheduler(&config).expect("Failed to build scheduler");
    let report = scheduler.run().await;

    assert!(report.visited.is_empty());
    assert_eq!(report.stats.pages_skipped, 1);
    assert_eq!(scheduler.state(), CrawlState::Done);
}

#[tokio::test]
async fn test_identity_sent_on_every_request() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)]);
    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.visited, vec![format!("{}/", base_url)]);
}

#[tokio::test]
async fn test_fetch_failure_still_marks_visited() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/broken", base_url)]);
    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.visited, vec![format!("{}/broken", base_url)]);
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.links_discovered, 0);
}

#[tokio::test]
async fn test_unavailable_probe_is_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // First probe is refused with 503, the retry succeeds
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>back</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(vec![format!("{}/", base_url)]);
    config.crawler.retry_unavailable = 1;
    config.crawler.retry_delay = 0;

    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.visited, vec![format!("{}/", base_url)]);
    assert_eq!(report.stats.politeness_delays, 2);
}

#[tokio::test]
async fn test_unavailable_without_retry_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)]);
    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert!(report.visited.is_empty());
    assert_eq!(report.stats.pages_skipped, 1);
}

#[tokio::test]
async fn test_stop_signal_before_start() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let stop = CancellationToken::new();
    stop.cancel();

    let config = create_test_config(vec![
        format!("{}/a", base_url),
        format!("{}/b", base_url),
    ]);
    let report = crawl(&config, stop).await.expect("Crawl failed");

    assert!(report.stopped);
    assert_eq!(report.remaining, 2);
    assert!(report.visited.is_empty());
}

#[tokio::test]
async fn test_non_utf8_page_yields_no_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("HEAD"))
        .and(path("/latin1"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"<a href=\"/next\">caf\xe9</a>".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/latin1", base_url)]);
    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.visited, vec![format!("{}/latin1", base_url)]);
    assert_eq!(report.stats.decode_failures, 1);
    assert_eq!(report.stats.links_discovered, 0);
}
