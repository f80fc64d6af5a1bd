//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch → extract → paginate cycle end-to-end.

use harvest::config::{parse_config, Config, HttpConfig, ParsingRules, SiteConfig};
use harvest::crawler::{
    build_http_client, run_harvest, FetchError, HttpFetcher, NoopEvents, PageFetcher, SiteCrawler,
    StopReason,
};
use harvest::output::save_records;
use harvest::HarvestError;
use std::collections::BTreeMap;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_1: &str = r#"<html><body>
    <div class="q">
        <span class="text">The world as we have created it is a process of our thinking.</span>
        <small class="by">Albert Einstein</small>
        <a class="tag">change</a>
        <a class="tag">thinking</a>
    </div>
    <div class="q">
        <span class="text">It is our choices that show what we truly are.</span>
        <a class="tag">choices</a>
    </div>
    <ul class="pager"><li class="next"><a href="/p2">Next</a></li></ul>
</body></html>"#;

const PAGE_2: &str = r#"<html><body>
    <div class="q">
        <span class="text">There are only two ways to live your life.</span>
        <small class="by">Albert Einstein</small>
    </div>
</body></html>"#;

/// Builds a single-site configuration pointing at the mock server
fn site_config(base_url: &str, entry_path: &str, next_page: Option<&str>) -> SiteConfig {
    SiteConfig {
        url: format!("{}{}", base_url, entry_path),
        parsing_rules: ParsingRules {
            quote_block: ".q".to_string(),
            quote: Some(".text".to_string()),
            author: Some(".by".to_string()),
            tags: Some(".tag".to_string()),
            fields: BTreeMap::new(),
            lists: BTreeMap::new(),
        },
        next_page_selector: next_page.map(str::to_string),
        base_url: base_url.to_string(),
        max_pages: None,
    }
}

fn create_test_config(sites: Vec<SiteConfig>, output_file: &str) -> Config {
    Config {
        output_file: output_file.to_string(),
        http: HttpConfig {
            timeout_secs: 5,
            ..HttpConfig::default()
        },
        sites,
    }
}

async fn mount_page(server: &MockServer, page: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(hits)
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_two_page_site() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/p1", PAGE_1, 1).await;
    mount_page(&mock_server, "/p2", PAGE_2, 1).await;

    let config = create_test_config(
        vec![site_config(&mock_server.uri(), "/p1", Some("li.next > a"))],
        "unused.json",
    );

    let result = run_harvest(&config).await.expect("crawl should run");

    assert_eq!(result.records.len(), 3);
    assert_eq!(result.records[0].field("author"), Some("Albert Einstein"));
    assert_eq!(result.records[0].list("tags"), &["change", "thinking"]);
    assert_eq!(result.records[1].field("author"), None);
    assert_eq!(result.records[1].list("tags"), &["choices"]);
    assert_eq!(
        result.records[2].field("quote"),
        Some("There are only two ways to live your life.")
    );

    assert_eq!(result.sites[0].pages_fetched, 2);
    assert_eq!(result.sites[0].stop, StopReason::LastPage);
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_pagination_disabled_fetches_once() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/p1", PAGE_1, 1).await;
    mount_page(&mock_server, "/p2", PAGE_2, 0).await;

    let config = create_test_config(
        vec![site_config(&mock_server.uri(), "/p1", None)],
        "unused.json",
    );

    let result = run_harvest(&config).await.unwrap();

    assert_eq!(result.records.len(), 2);
    assert_eq!(request_count(&mock_server).await, 1);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_other_sites() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // Site A: page 1 ok, page 2 is a server error
    mount_page(&mock_server, "/a/p1", &PAGE_1.replace("/p2", "/a/p2"), 1).await;
    Mock::given(method("GET"))
        .and(path("/a/p2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Site B: fully reachable
    mount_page(&mock_server, "/b/p1", &PAGE_1.replace("/p2", "/b/p2"), 1).await;
    mount_page(&mock_server, "/b/p2", PAGE_2, 1).await;

    let config = create_test_config(
        vec![
            site_config(&base, "/a/p1", Some("li.next > a")),
            site_config(&base, "/b/p1", Some("li.next > a")),
        ],
        "unused.json",
    );

    let result = run_harvest(&config).await.unwrap();

    assert_eq!(result.sites[0].records, 2);
    assert!(matches!(
        result.sites[0].stop,
        StopReason::FetchFailed(FetchError::Status { status: 500, .. })
    ));
    assert_eq!(result.sites[1].records, 3);
    assert_eq!(result.records.len(), 5);
}

#[tokio::test]
async fn test_unreachable_site_still_writes_output() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.json");
    let config = create_test_config(
        vec![site_config(&mock_server.uri(), "/missing", Some(".next"))],
        output.to_str().unwrap(),
    );

    let result = run_harvest(&config).await.unwrap();
    save_records(&result.records, &output).unwrap();

    assert!(result.records.is_empty());
    assert_eq!(std::fs::read_to_string(&output).unwrap().trim(), "[]");
}

#[tokio::test]
async fn test_config_file_to_output_file() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/p1", PAGE_1, 1).await;
    mount_page(&mock_server, "/p2", PAGE_2, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.json");
    let config = parse_config(&format!(
        r#"
output_file = "{output}"

[[sites]]
url = "{base}/p1"
base_url = "{base}"
next_page_selector = ".next a"

[sites.parsing_rules]
quote_block = ".q"
quote = ".text"
author = ".by"
tags = ".tag"
"#,
        output = output.display(),
        base = mock_server.uri()
    ))
    .unwrap();

    let result = run_harvest(&config).await.unwrap();
    save_records(&result.records, output.as_path()).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let records = written.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records[1]["author"].is_null());
    assert_eq!(records[0]["tags"], serde_json::json!(["change", "thinking"]));
    assert_eq!(records[2]["tags"], serde_json::json!([]));
}

#[tokio::test]
async fn test_bad_selector_aborts_before_fetching() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/p1", PAGE_1, 0).await;

    let mut site = site_config(&mock_server.uri(), "/p1", None);
    site.parsing_rules.quote_block = "div[".to_string();
    let config = create_test_config(vec![site], "unused.json");

    let result = run_harvest(&config).await;

    assert!(matches!(result, Err(HarvestError::Config(_))));
    assert_eq!(request_count(&mock_server).await, 0);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/p1", PAGE_1, 1).await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE_2)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let http = HttpConfig {
        timeout_secs: 1,
        ..HttpConfig::default()
    };
    let fetcher = HttpFetcher::with_client(build_http_client(&http).unwrap());

    let slow_url = format!("{}/p2", base);
    let err = fetcher.fetch(&slow_url).await.unwrap_err();
    assert_eq!(err, FetchError::Timeout { url: slow_url.clone() });

    let mut config = create_test_config(
        vec![site_config(&base, "/p1", Some("li.next > a"))],
        "unused.json",
    );
    config.http = http;
    let sites = config.site_specs().unwrap();

    let crawl = SiteCrawler::new(&fetcher, &NoopEvents)
        .crawl_site(&sites[0])
        .await;

    assert_eq!(crawl.records.len(), 2);
    assert_eq!(crawl.summary.pages_fetched, 1);
    assert_eq!(
        crawl.summary.stop,
        StopReason::FetchFailed(FetchError::Timeout { url: slow_url })
    );
}
