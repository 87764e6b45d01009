//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use program_scout::config::{Config, UserAgentConfig};
use program_scout::crawler::{run_crawl, Fetcher, HttpFetcher};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.target.homepage = base_url.to_string();
    config.target.criteria = "undergraduate majors".to_string();
    config.user_agent.crawler_name = "TestBot".to_string();
    config.crawler.timeout_secs = 5;
    config
}

fn fetcher(timeout: Duration) -> Arc<dyn Fetcher> {
    Arc::new(HttpFetcher::from_config(&UserAgentConfig::default(), timeout).unwrap())
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Paths the server saw, robots.txt excluded, in arrival order
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|request| request.url.path().to_string())
        .filter(|p| p != "/robots.txt")
        .collect()
}

#[tokio::test]
async fn test_crawl_follows_only_relevant_links() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body>
            <a href="/academics">Academics</a>
            <a href="/about">About Us</a>
            <a href="/program-directory">Programs</a>
            <a href="mailto:info@example.edu">Email</a>
            <a href="https://elsewhere.example.com/majors">Partner majors</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/academics",
        r#"<a href="/academics/majors/biology-bs">Biology Major</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/academics/majors/biology-bs",
        "<h1>Biology (B.S.)</h1>",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<h1>About</h1>"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/program-directory"))
        .respond_with(html("<h1>Directory</h1>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let outcome = run_crawl(&config, fetcher(Duration::from_secs(5)))
        .await
        .unwrap();

    let urls: Vec<String> = outcome.pages.iter().map(|p| p.url.path().to_string()).collect();
    assert_eq!(urls, vec!["/academics", "/academics/majors/biology-bs"]);
    assert_eq!(outcome.pages[1].anchor_text, "Biology Major");
    assert!(outcome.pages[1]
        .markup
        .as_deref()
        .unwrap()
        .contains("Biology (B.S.)"));
    assert_eq!(outcome.stats.pages_visited, 3);
}

#[tokio::test]
async fn test_timeout_does_not_halt_crawl() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/programs/slow">Slow Program</a><a href="/programs/fast">Fast Program</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/programs/slow"))
        .respond_with(html("<h1>Slow</h1>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_page(&server, "/programs/fast", "<h1>Fast</h1>").await;

    let config = create_test_config(&server.uri());
    let outcome = run_crawl(&config, fetcher(Duration::from_millis(500)))
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 2);
    assert_eq!(outcome.pages[0].markup, None);
    assert_eq!(outcome.pages[1].markup.as_deref(), Some("<h1>Fast</h1>"));
    assert_eq!(outcome.stats.fetch_failures, 1);
    assert_eq!(outcome.stats.timeouts, 1);
}

#[tokio::test]
async fn test_page_ceiling_limits_requests() {
    let server = MockServer::start().await;

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/programs/p{}">Program {}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", links).await;
    Mock::given(method("GET"))
        .respond_with(html("<h1>Program</h1>"))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.crawler.max_pages = 5;
    config.crawler.respect_robots = false;

    let outcome = run_crawl(&config, fetcher(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(requested_paths(&server).await.len(), 5);
    assert_eq!(outcome.stats.pages_visited, 5);
    assert!(outcome.stats.page_ceiling_reached);
    assert_eq!(outcome.pages.len(), 4);
    assert_eq!(outcome.pages[3].url.path(), "/programs/p3");
}

#[tokio::test]
async fn test_depth_limit_stops_descent() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/academics">Academics</a>"#).await;
    mount_page(
        &server,
        "/academics",
        r#"<a href="/academics/majors">Majors</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/academics/majors"))
        .respond_with(html("<h1>Majors</h1>"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.crawler.max_depth = Some(1);

    let outcome = run_crawl(&config, fetcher(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.pages[0].url.path(), "/academics");
}

#[tokio::test]
async fn test_fragments_collapse_and_trailing_slash_is_distinct() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r##"<a href="/programs#top">Programs</a>
            <a href="/programs#list">All programs</a>
            <a href="/programs/">Programs index</a>"##,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/programs"))
        .respond_with(html("<h1>Programs</h1>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/programs/"))
        .respond_with(html("<h1>Programs index</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let outcome = run_crawl(&config, fetcher(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 2);
    assert_eq!(outcome.pages[0].anchor_text, "Programs");
}

#[tokio::test]
async fn test_off_origin_redirect_is_discarded() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/programs/moved">Moved program</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/programs/moved"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/landing", elsewhere.uri()).as_str()),
        )
        .mount(&server)
        .await;
    mount_page(
        &elsewhere,
        "/landing",
        format!(
            r#"<h1>Elsewhere</h1><a href="{}/programs/hidden">Hidden program</a>"#,
            server.uri()
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/programs/hidden"))
        .respond_with(html("<h1>Hidden</h1>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let outcome = run_crawl(&config, fetcher(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.pages[0].markup, None);
    assert_eq!(outcome.stats.off_scope_redirects, 1);
}

#[tokio::test]
async fn test_robots_disallow_prevents_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /programs/private"),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"<a href="/programs/private">Private program</a><a href="/programs/public">Public program</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/programs/private"))
        .respond_with(html("<h1>Private</h1>"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/programs/public", "<h1>Public</h1>").await;

    let config = create_test_config(&server.uri());
    let outcome = run_crawl(&config, fetcher(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome.stats.robots_denied, 1);
    assert_eq!(outcome.pages.len(), 2);
    assert_eq!(outcome.pages[0].markup, None);
    assert!(outcome.pages[1].markup.is_some());
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/programs">Programs</a>"#).await;
    mount_page(&server, "/programs", "<h1>Programs</h1>").await;

    let mut config = create_test_config(&server.uri());
    config.crawler.respect_robots = false;

    let outcome = run_crawl(&config, fetcher(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert!(outcome.pages[0].markup.is_some());
}

#[tokio::test]
async fn test_non_html_and_error_pages_recorded_without_markup() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/programs/brochure.pdf">Program brochure</a>
           <a href="/programs/gone">Retired program</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/programs/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/programs/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let outcome = run_crawl(&config, fetcher(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 2);
    assert!(outcome.pages.iter().all(|p| p.markup.is_none()));
    assert_eq!(outcome.stats.fetch_failures, 2);
    assert_eq!(outcome.stats.timeouts, 0);
}
