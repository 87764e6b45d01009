//! Integration tests for the full crawl-and-extract pipeline
//!
//! A wiremock server plays the institution's website and, where needed, an
//! OpenAI-compatible chat-completions endpoint.

use program_scout::config::{load_config, Config};
use program_scout::crawler::build_fetcher;
use program_scout::extract::{InferenceClient, OpenAiClient};
use program_scout::output::write_csv;
use program_scout::{Pipeline, PipelineOutcome};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/v1/chat/completions";

fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.target.homepage = base_url.to_string();
    config.target.criteria = "undergraduate majors".to_string();
    config.crawler.timeout_secs = 5;
    config
}

async fn mount_page(server: &MockServer, page_path: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into(), "text/html"))
        .mount(server)
        .await;
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

fn inference_client(server: &MockServer) -> Arc<dyn InferenceClient> {
    Arc::new(
        OpenAiClient::new(
            format!("{}{}", server.uri(), CHAT_PATH),
            "gpt-4o-mini",
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap(),
    )
}

/// A page with plenty of text but no heading that names a program
fn wordy_page() -> String {
    format!(
        "<html><body><div class=\"intro\"><p>{}</p></div></body></html>",
        "Students choose from a wide range of fields of study and research. ".repeat(8)
    )
}

async fn run(config: Config, inference: Option<Arc<dyn InferenceClient>>) -> PipelineOutcome {
    let fetcher = build_fetcher(&config).unwrap();
    Pipeline::new(config, fetcher, inference)
        .unwrap()
        .run()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_biology_major_end_to_end() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/academics/majors/biology-bs">Biology Major</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/academics/majors/biology-bs",
        "<html><body><h1>Biology (B.S.)</h1></body></html>",
    )
    .await;

    let outcome = run(create_test_config(&server.uri()), None).await;

    let PipelineOutcome::Success { rows, stats } = outcome else {
        panic!("expected a successful run");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].program_name, "Biology (B.S.)");
    assert_eq!(
        rows[0].full_url,
        format!("{}/academics/majors/biology-bs", server.uri())
    );
    assert_eq!(rows[0].relative_path, "academics/majors/biology-bs");
    assert_eq!(rows[0].pattern, "/academics/majors/.*bs");
    assert_eq!(stats.titles_from_selectors, 1);

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("programs.csv");
    write_csv(&csv_path, &rows).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains(",academics/majors/biology-bs,,,,/academics/majors/.*bs"));
}

#[tokio::test]
async fn test_site_without_program_links_reports_no_candidates() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/about">About</a><a href="/news">Program news</a>"#,
    )
    .await;

    let outcome = run(create_test_config(&server.uri()), None).await;

    assert!(matches!(outcome, PipelineOutcome::NoCandidates { .. }));
    assert_eq!(outcome.stats().candidates, 0);
    assert_eq!(outcome.stats().crawl.pages_visited, 1);
}

#[tokio::test]
async fn test_inference_fallback_produces_rows() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/programs/overview">Programs</a>"#).await;
    mount_page(&server, "/programs/overview", wordy_page()).await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .respond_with(chat_reply("1. Economics (B.A.)\n2. History (B.A.)"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.extraction.selectors = vec![".program-title".to_string()];
    let inference = inference_client(&server);

    let outcome = run(config, Some(inference)).await;

    let names: Vec<&str> = outcome
        .rows()
        .iter()
        .map(|r| r.program_name.as_str())
        .collect();
    assert_eq!(names, vec!["Economics (B.A.)", "History (B.A.)"]);
    assert!(outcome.rows().iter().all(|r| r.pattern == "/programs/.*"));
    assert_eq!(outcome.stats().titles_from_inference, 1);
}

#[tokio::test]
async fn test_inference_none_yields_no_row() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/programs/overview">Programs</a>"#).await;
    mount_page(&server, "/programs/overview", wordy_page()).await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(chat_reply("NONE"))
        .expect(1)
        .mount(&server)
        .await;

    let inference = inference_client(&server);
    let outcome = run(create_test_config(&server.uri()), Some(inference)).await;

    assert!(matches!(outcome, PipelineOutcome::NoCandidates { .. }));
    assert_eq!(outcome.stats().candidates, 1);
    assert_eq!(outcome.stats().untitled, 1);
}

#[tokio::test]
async fn test_inference_provider_error_yields_no_row() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/programs/overview">Programs</a><a href="/majors/music-ba">Music Major</a>"#,
    )
    .await;
    mount_page(&server, "/programs/overview", wordy_page()).await;
    mount_page(&server, "/majors/music-ba", "<h1>Music (B.A.)</h1>").await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
        .mount(&server)
        .await;

    let inference = inference_client(&server);
    let outcome = run(create_test_config(&server.uri()), Some(inference)).await;

    assert_eq!(outcome.rows().len(), 1);
    assert_eq!(outcome.rows()[0].program_name, "Music (B.A.)");
    assert_eq!(outcome.stats().untitled, 1);
}

#[tokio::test]
async fn test_structured_title_skips_inference() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/majors/nursing-bsn">Nursing Major</a>"#).await;
    mount_page(
        &server,
        "/majors/nursing-bsn",
        format!("<h1>Nursing (BSN)</h1>{}", wordy_page()),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(chat_reply("Should not be used"))
        .expect(0)
        .mount(&server)
        .await;

    let inference = inference_client(&server);
    let outcome = run(create_test_config(&server.uri()), Some(inference)).await;

    assert_eq!(outcome.rows().len(), 1);
    assert_eq!(outcome.rows()[0].program_name, "Nursing (BSN)");
    assert_eq!(outcome.rows()[0].pattern, "/majors/.*bsn");
}

#[tokio::test]
async fn test_config_file_drives_run() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/grad/nursing-msn">Nursing</a><a href="/grad/about">About</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/grad/nursing-msn",
        r#"<h2 class="degree">Master of Science in Nursing</h2>"#,
    )
    .await;

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[target]
institution = "Example University"
homepage = "{}"
criteria = "graduate nursing"

[crawler]
max-depth = 2
max-pages = 20
respect-robots = false

[keywords]
allow = ["nursing"]

[extraction]
selectors = ["h2.degree"]
"#,
        server.uri()
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.keywords.allow, vec!["nursing"]);
    assert_eq!(config.crawler.max_depth, Some(2));

    let outcome = run(config, None).await;

    assert_eq!(outcome.rows().len(), 1);
    assert_eq!(
        outcome.rows()[0].program_name,
        "Master of Science in Nursing"
    );
    assert_eq!(outcome.rows()[0].relative_path, "grad/nursing-msn");
    assert_eq!(outcome.rows()[0].pattern, "/grad/.*msn");
}

#[test]
fn test_invalid_homepage_fails_before_crawl() {
    let mut config = create_test_config("ftp://example.edu");
    config.crawler.respect_robots = false;
    let fetcher = build_fetcher(&config).unwrap();
    assert!(Pipeline::new(config, fetcher, None).is_err());
}
