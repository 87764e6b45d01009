//! Headless browser fetcher
//!
//! Alternate fetch strategy for sites that render their navigation with
//! JavaScript. A headless Chromium-compatible binary is launched per page with
//! `--dump-dom`, and the serialized DOM it prints is returned as the page body.

use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use url::Url;

/// Fetcher that renders pages with a headless browser
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    binary: String,
    timeout: Duration,
    user_agent: String,
}

impl BrowserFetcher {
    /// Creates a browser fetcher
    ///
    /// # Arguments
    ///
    /// * `binary` - Executable name or path (e.g. `chromium`)
    /// * `timeout` - Upper bound for one page render, process start included
    /// * `user_agent` - User-Agent string the browser announces
    pub fn new(binary: impl Into<String>, timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            user_agent: user_agent.into(),
        }
    }

    fn command(&self, url: &Url) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg(format!("--user-agent={}", self.user_agent))
            .arg(format!("--timeout={}", self.timeout.as_millis()))
            .arg("--dump-dom")
            .arg(url.as_str())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &Url) -> FetchOutcome {
        let output = match tokio::time::timeout(self.timeout, self.command(url).output()).await {
            Err(_) => {
                return FetchOutcome::NetworkError {
                    error: format!("Browser render timed out after {:?}", self.timeout),
                    timed_out: true,
                }
            }
            Ok(Err(e)) => {
                return FetchOutcome::NetworkError {
                    error: format!("Failed to launch browser '{}': {}", self.binary, e),
                    timed_out: false,
                }
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return FetchOutcome::NetworkError {
                error: format!(
                    "Browser exited with {}: {}",
                    output.status,
                    stderr.trim()
                ),
                timed_out: false,
            };
        }

        let body = String::from_utf8_lossy(&output.stdout).into_owned();
        if body.trim().is_empty() {
            return FetchOutcome::NetworkError {
                error: "Browser returned an empty DOM".to_string(),
                timed_out: false,
            };
        }

        // The rendered DOM carries no redirect information; the requested URL
        // is reported as final.
        FetchOutcome::Success {
            final_url: url.clone(),
            status_code: 200,
            content_type: "text/html".to_string(),
            body,
        }
    }
}
